use url::Url;

pub type NetResult = Result<Vec<u8>, i32>;

#[derive(Clone)]
pub struct NetTaskState {
    pub result: Option<NetResult>,
}

#[derive(Clone)]
pub struct NetTask {
    pub id: u32,
    pub url: String,
    pub resolved_url: Url,
    pub method: HttpMethod,
    pub post_data: Option<String>,
}

#[derive(Clone)]
pub enum HttpMethod {
    Get,
    Post,
}

impl NetTask {
    pub fn new(id: u32, url: &String, resolved_url: &Url) -> NetTask {
        NetTask {
            id,
            url: url.to_owned(),
            resolved_url: resolved_url.to_owned(),
            method: HttpMethod::Get,
            post_data: None,
        }
    }

    pub fn new_post(id: u32, url: &str, resolved_url: &Url, post_data: String) -> NetTask {
        NetTask {
            id,
            url: url.to_owned(),
            resolved_url: resolved_url.to_owned(),
            method: HttpMethod::Post,
            post_data: Some(post_data),
        }
    }
}

impl NetTaskState {
    pub fn is_done(&self) -> bool {
        self.result.is_some()
    }
}
