use std::{
    collections::HashMap,
    path::Path,
    sync::Arc,
    thread::{self, JoinHandle},
};

use url::Url;

use super::net_task::{HttpMethod, NetResult, NetTask, NetTaskState};

/// Fetches the bytes behind a resolved URL on a background thread.
///
/// LibreShockwave ships `FileNetProvider`, which only understands `file://`.
/// A host embedding the engine supplies its own provider (e.g. backed by
/// `reqwest` or a bundled asset store) to support other schemes.
pub trait NetProvider: Send + Sync {
    fn fetch(&self, url: &Url, method: &HttpMethod, post_data: Option<&str>) -> NetResult;
}

/// Reads `file://` URLs straight off disk. HTTP(S) and any other scheme are
/// reported as unsupported; embedders that need them provide their own
/// `NetProvider`.
pub struct FileNetProvider;

impl NetProvider for FileNetProvider {
    fn fetch(&self, url: &Url, _method: &HttpMethod, _post_data: Option<&str>) -> NetResult {
        if url.scheme() != "file" {
            return Err(3);
        }
        let path = url.to_file_path().map_err(|_| 3)?;
        std::fs::read(path).map_err(|_| 2)
    }
}

pub struct NetManager {
    pub base_path: Option<Url>,
    pub tasks: HashMap<u32, NetTask>,
    results: HashMap<u32, NetResult>,
    handles: HashMap<u32, JoinHandle<NetResult>>,
    provider: Arc<dyn NetProvider>,
}

impl NetManager {
    pub fn new(provider: Arc<dyn NetProvider>) -> NetManager {
        NetManager {
            base_path: None,
            tasks: HashMap::new(),
            results: HashMap::new(),
            handles: HashMap::new(),
            provider,
        }
    }

    pub fn set_base_path(&mut self, base_path: Url) {
        let sanitized_path = if !base_path.path().ends_with("/") {
            Url::parse(format!("{}/", base_path.to_string()).as_str()).unwrap()
        } else {
            base_path
        };
        self.base_path = Some(sanitized_path);
    }

    pub fn get_task_state(&self, task_id: Option<u32>) -> Option<NetTaskState> {
        let task_id = task_id.unwrap_or(self.tasks.len() as u32);
        Some(NetTaskState {
            result: self.results.get(&task_id).cloned(),
        })
    }

    pub fn is_task_done(&self, task_id: Option<u32>) -> bool {
        let task_id = task_id.unwrap_or(self.tasks.len() as u32);
        self.results.contains_key(&task_id)
    }

    pub fn get_task_result(&self, task_id: Option<u32>) -> Option<NetResult> {
        let task_id = task_id.unwrap_or(self.tasks.len() as u32);
        self.results.get(&task_id).cloned()
    }

    pub fn get_task(&self, task_id: u32) -> Option<&NetTask> {
        self.tasks.get(&task_id)
    }

    /// Blocks the calling thread until `task_id` completes. Used by the
    /// synchronous cast-preload path; the frame loop itself never calls
    /// this and instead drains finished tasks via `poll_tasks`.
    pub fn await_task(&mut self, task_id: u32) {
        if self.results.contains_key(&task_id) {
            return;
        }
        if let Some(handle) = self.handles.remove(&task_id) {
            let result = handle.join().unwrap_or(Err(4));
            self.results.insert(task_id, result);
        }
    }

    /// Moves any finished background task's result into `results` without
    /// blocking. Call once per tick from the frame loop.
    pub fn poll_tasks(&mut self) {
        let finished: Vec<u32> = self
            .handles
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(id, _)| *id)
            .collect();
        for task_id in finished {
            if let Some(handle) = self.handles.remove(&task_id) {
                let result = handle.join().unwrap_or(Err(4));
                self.results.insert(task_id, result);
            }
        }
    }

    pub fn preload_net_thing(&mut self, url: String) -> u32 {
        if let Some(existing_task) = find_task_with_url(&self.tasks, &url) {
            return existing_task.id;
        }

        let id = self.tasks.len() as u32 + 1;
        let net_task = NetTask::new(id, &url, &normalize_task_url(&url, self.base_path.as_ref()));
        self.spawn_task(net_task)
    }

    pub fn post_net_text(&mut self, url: String, post_data: String) -> u32 {
        let id = self.tasks.len() as u32 + 1;
        let net_task = NetTask::new_post(
            id,
            &url,
            &normalize_task_url(&url, self.base_path.as_ref()),
            post_data,
        );
        self.spawn_task(net_task)
    }

    fn spawn_task(&mut self, net_task: NetTask) -> u32 {
        let task_id = net_task.id;
        let resolved_url = net_task.resolved_url.clone();
        let method = net_task.method.clone();
        let post_data = net_task.post_data.clone();
        let provider = Arc::clone(&self.provider);

        self.tasks.insert(task_id, net_task);

        let handle = thread::spawn(move || provider.fetch(&resolved_url, &method, post_data.as_deref()));
        self.handles.insert(task_id, handle);

        task_id
    }
}

fn normalize_task_url(url: &String, base_path: Option<&Url>) -> Url {
    let slash_norm = url.replace("\\", "/");
    let parsed_path = Path::new(slash_norm.as_str());
    let parsed_url = Url::parse(&slash_norm);

    if let Ok(parsed_url) = parsed_url {
        if parsed_url.has_host() {
            return parsed_url;
        }
    }

    if parsed_path.is_absolute() {
        return Url::parse(format!("file:///{slash_norm}").as_str()).unwrap();
    } else if let Some(base_path) = base_path {
        return base_path.join(url.as_str()).unwrap();
    } else {
        return Url::parse(&slash_norm).unwrap();
    }
}

pub fn find_task_with_url<'a>(
    tasks: &'a HashMap<u32, NetTask>,
    url: &String,
) -> Option<&'a NetTask> {
    tasks
        .iter()
        .find(|(_, x)| x.url.as_str() == url)
        .map(|x| x.1)
}

#[allow(dead_code)]
pub fn find_task_with_id(tasks: &HashMap<u32, NetTask>, id: u32) -> Option<&NetTask> {
    tasks.get(&id)
}
