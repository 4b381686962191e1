pub mod allocator;
pub mod bytecode;
pub mod cast_lib;
pub mod cast_manager;
pub mod cast_member;
pub mod compare;
pub mod context_vars;
pub mod datum_formatting;
pub mod datum_operations;
pub mod datum_ref;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod handlers;
pub mod image_ref;
pub mod keyboard;
pub mod keyboard_events;
pub mod keyboard_map;
pub mod movie;
pub mod net_manager;
pub mod net_task;
pub mod profiling;
pub mod scope;
pub mod score;
pub mod score_keyframes;
pub mod script;
pub mod script_ref;
pub mod sprite;
pub mod timeout;

use std::{cell::RefCell, collections::HashMap, sync::mpsc::Sender, sync::Arc};

use allocator::{
    DatumAllocator, DatumAllocatorEvent, DatumAllocatorTrait, ResetableAllocator,
    ScriptInstanceAllocatorTrait,
};
use datum_ref::DatumRef;
use fxhash::FxHashMap;
use handlers::datum_handlers::script_instance::ScriptInstanceUtils;
use log::warn;
use net_manager::{FileNetProvider, NetManager, NetProvider};
use profiling::get_profiler_report;
use scope::ScopeResult;
use score::{get_sprite_at, Score};
use script::script_get_prop_opt;
use script_ref::ScriptInstanceRef;

use crate::{
    config::{DebugTap, EngineConfig, NullDebugTap},
    director::{
        chunks::handler::{Bytecode, HandlerDef},
        enums::ScriptType,
        file::{read_director_file_bytes, DirectorFile},
        lingo::{
            constants::{get_anim2_prop_name, get_anim_prop_name},
            datum::{datum_bool, Datum, DatumType, VarRef},
        },
    },
    player::{
        bytecode::handler_manager::{player_execute_bytecode, BytecodeHandlerContext},
        geometry::IntRect,
        scope::Scope,
    },
    utils::{get_base_url, get_basename_no_extension, get_elapsed_ticks},
};

use self::{
    bytecode::handler_manager::StaticBytecodeHandlerManager,
    cast_lib::CastMemberRef,
    cast_manager::CastManager,
    events::{player_invoke_global_event, player_unwrap_result},
    handlers::manager::BuiltInHandlerManager,
    keyboard::KeyboardManager,
    movie::Movie,
    scope::ScopeRef,
    script::{Script, ScriptHandlerRef},
    sprite::{ColorRef, CursorRef},
    timeout::TimeoutManager,
};

use crate::player::handlers::datum_handlers::date::DateObject;
use crate::player::handlers::datum_handlers::math::MathObject;
use crate::player::handlers::datum_handlers::sound_channel::{
    AudioData, SoundChannelDatumHandlers, SoundManager,
};
use crate::player::handlers::datum_handlers::xml::{XmlDocument, XmlNode};

pub enum HandlerExecutionResult {
    Advance,
    Stop,
    Jump,
    Error(ScriptError),
}

pub struct HandlerExecutionResultContext {
    pub result: HandlerExecutionResult,
}

pub const MAX_STACK_SIZE: usize = 50;

pub struct DirPlayer {
    pub net_manager: NetManager,
    pub movie: Movie,
    pub is_playing: bool,
    pub is_script_paused: bool,
    pub next_frame: Option<u32>,
    pub globals: FxHashMap<String, DatumRef>,
    pub scopes: Vec<Scope>,
    pub bytecode_handler_manager: StaticBytecodeHandlerManager,
    pub stage_size: (u32, u32),
    pub cursor: CursorRef,
    pub start_time: chrono::DateTime<chrono::Local>,
    pub timeout_manager: TimeoutManager,
    pub title: String,
    pub bg_color: ColorRef,
    pub keyboard_focus_sprite: i16,
    pub text_selection_start: u16,
    pub text_selection_end: u16,
    pub mouse_loc: (i32, i32),
    pub last_mouse_down_time: i64,
    pub is_double_click: bool,
    pub mouse_down_sprite: i16,
    pub keyboard_manager: KeyboardManager,
    pub float_precision: u8,
    pub last_handler_result: DatumRef,
    pub hovered_sprite: Option<i16>,
    pub allocator: DatumAllocator,
    pub scope_count: u32,
    pub external_params: HashMap<String, String>,
    pub xml_documents: HashMap<u32, XmlDocument>,
    pub xml_nodes: HashMap<u32, XmlNode>,
    pub next_xml_id: u32,
    pub sound_manager: SoundManager,
    pub date_objects: HashMap<u32, DateObject>,
    pub math_objects: HashMap<u32, MathObject>,
    pub config: EngineConfig,
    pub debug_tap: Box<dyn DebugTap>,
    pub last_script_error: Option<String>,
}

impl DirPlayer {
    pub fn new(config: EngineConfig, net_provider: Arc<dyn NetProvider>, debug_tap: Box<dyn DebugTap>) -> DirPlayer {
        let sound_manager = SoundManager::new(config.channel_count.unwrap_or(8))
            .expect("sound manager failed to initialize");

        let mut result = DirPlayer {
            movie: Movie {
                rect: IntRect::from(0, 0, 0, 0),
                cast_manager: CastManager::empty(),
                score: Score::empty(),
                current_frame: 1,
                puppet_tempo: 0,
                exit_lock: false,
                dir_version: 0,
                item_delimiter: config.string_chunk_item_delimiter,
                alert_hook: None,
                base_path: "".to_string(),
                file_name: "".to_string(),
                stage_color: (0, 0, 0),
                frame_rate: 30,
                file: None,
                update_lock: false,
            },
            net_manager: NetManager::new(net_provider),
            is_playing: false,
            is_script_paused: false,
            next_frame: None,
            globals: FxHashMap::default(),
            scopes: Vec::with_capacity(MAX_STACK_SIZE),
            bytecode_handler_manager: StaticBytecodeHandlerManager {},
            stage_size: (100, 100),
            cursor: CursorRef::System(0),
            start_time: chrono::Local::now(),
            timeout_manager: TimeoutManager::new(),
            title: "".to_string(),
            bg_color: ColorRef::Rgb(0, 0, 0),
            keyboard_focus_sprite: -1,
            mouse_loc: (0, 0),
            last_mouse_down_time: 0,
            is_double_click: false,
            mouse_down_sprite: 0,
            keyboard_manager: KeyboardManager::new(),
            text_selection_start: 0,
            text_selection_end: 0,
            float_precision: 4,
            last_handler_result: DatumRef::Void,
            hovered_sprite: None,
            allocator: DatumAllocator::default(),
            scope_count: 0,
            external_params: HashMap::new(),
            xml_documents: HashMap::new(),
            xml_nodes: HashMap::new(),
            next_xml_id: 1000,
            sound_manager,
            date_objects: HashMap::new(),
            math_objects: HashMap::new(),
            config,
            debug_tap,
            last_script_error: None,
        };

        let actor_list_datum = result.alloc_datum(Datum::List(DatumType::List, vec![], false));
        result
            .globals
            .insert("actorList".to_string(), actor_list_datum);
        result.globals.insert("VOID".to_string(), DatumRef::Void);

        for i in 0..MAX_STACK_SIZE {
            result.scopes.push(Scope::default(i));
        }
        result
    }

    pub fn load_movie_from_file(&mut self, path: &str) -> Result<(), ScriptError> {
        let task_id = self.net_manager.preload_net_thing(path.to_owned());
        self.net_manager.await_task(task_id);
        let task = self
            .net_manager
            .get_task(task_id)
            .ok_or_else(|| ScriptError::new("net task vanished".to_string()))?;
        let data_bytes = self
            .net_manager
            .get_task_result(Some(task_id))
            .and_then(|r| r.ok())
            .ok_or_else(|| ScriptError::new(format!("failed to load movie from {path}")))?;

        let movie_file = read_director_file_bytes(
            &data_bytes,
            &get_basename_no_extension(task.resolved_url.path()),
            &get_base_url(&task.resolved_url).to_string(),
        )
        .map_err(|err| ScriptError::new(err.to_string()))?;
        self.load_movie_from_dir(movie_file);
        Ok(())
    }

    fn load_movie_from_dir(&mut self, dir: DirectorFile) {
        self.movie.load_from_file(dir, &mut self.net_manager);
        let (r, g, b) = self.movie.stage_color;
        self.bg_color = ColorRef::Rgb(r, g, b);
    }

    pub fn play(&mut self) {
        if self.is_playing {
            return;
        }
        self.is_playing = true;
        self.is_script_paused = false;
        player_unwrap_result(player_invoke_global_event(
            &"prepareMovie".to_string(),
            &vec![],
        ));
    }

    pub fn pause_script(&mut self) {
        self.is_script_paused = true;
    }

    pub fn resume_script(&mut self) {
        self.is_script_paused = false;
    }

    pub fn get_datum(&self, id: &DatumRef) -> &Datum {
        self.allocator.get_datum(id)
    }

    pub fn get_datum_mut(&mut self, id: &DatumRef) -> &mut Datum {
        self.allocator.get_datum_mut(id)
    }

    pub fn get_fps(&self) -> u32 {
        if self.movie.puppet_tempo > 0 {
            self.movie.puppet_tempo
        } else {
            self.movie.frame_rate as u32
        }
    }

    pub fn get_hydrated_globals(&self) -> FxHashMap<String, &Datum> {
        self.globals
            .iter()
            .map(|(k, v)| (k.to_owned(), self.get_datum(v)))
            .collect()
    }

    #[allow(dead_code)]
    pub fn get_global(&self, name: &String) -> Option<&Datum> {
        self.globals
            .get(name)
            .map(|datum_ref| self.get_datum(datum_ref))
    }

    pub fn get_next_frame(&self) -> u32 {
        if !self.is_playing {
            return self.movie.current_frame;
        } else if let Some(next_frame) = self.next_frame {
            return next_frame;
        } else {
            return self.movie.current_frame + 1;
        }
    }

    pub fn advance_frame(&mut self) {
        if !self.is_playing {
            return;
        }
        self.next_frame = None;
        self.movie.current_frame = self.get_next_frame();
    }

    pub fn stop(&mut self) {
        self.is_playing = false;
        self.next_frame = None;
        self.timeout_manager.clear();
        warn!("Profiler report: {}", get_profiler_report());
    }

    pub fn reset(&mut self) {
        self.stop();
        self.scopes.clear();
        self.globals.clear();
        self.allocator.reset();
        self.timeout_manager.clear();
        self.movie.score.reset();
        self.movie.current_frame = 1;
        for i in 0..MAX_STACK_SIZE {
            self.scopes.push(Scope::default(i));
        }
    }

    pub fn alloc_datum(&mut self, datum: Datum) -> DatumRef {
        return self.allocator.alloc_datum(datum).unwrap();
    }

    fn get_movie_prop(&mut self, prop: &str) -> Result<DatumRef, ScriptError> {
        match prop {
            "stage" => Ok(self.alloc_datum(Datum::Stage)),
            "time" => Ok(self.alloc_datum(Datum::String(
                chrono::Local::now().format("%H:%M %p").to_string(),
            ))),
            "milliSeconds" => Ok(self.alloc_datum(Datum::Int(
                chrono::Local::now()
                    .signed_duration_since(self.start_time)
                    .num_milliseconds() as i32,
            ))),
            "keyboardFocusSprite" => {
                Ok(self.alloc_datum(Datum::Int(self.keyboard_focus_sprite as i32)))
            }
            "frameTempo" => Ok(self.alloc_datum(Datum::Int(self.movie.puppet_tempo as i32))),
            "mouseLoc" => Ok(self.alloc_datum(Datum::IntPoint(self.mouse_loc))),
            "mouseH" => Ok(self.alloc_datum(Datum::Int(self.mouse_loc.0 as i32))),
            "mouseV" => Ok(self.alloc_datum(Datum::Int(self.mouse_loc.1 as i32))),
            "rollover" => {
                let sprite = get_sprite_at(self, self.mouse_loc.0, self.mouse_loc.1, false);
                Ok(self.alloc_datum(Datum::Int(sprite.unwrap_or(0) as i32)))
            }
            "keyCode" => Ok(self.alloc_datum(Datum::Int(self.keyboard_manager.key_code() as i32))),
            "shiftDown" => Ok(self.alloc_datum(datum_bool(self.keyboard_manager.is_shift_down()))),
            "optionDown" => Ok(self.alloc_datum(datum_bool(self.keyboard_manager.is_alt_down()))),
            "commandDown" => {
                Ok(self.alloc_datum(datum_bool(self.keyboard_manager.is_command_down())))
            }
            "controlDown" => {
                Ok(self.alloc_datum(datum_bool(self.keyboard_manager.is_control_down())))
            }
            "altDown" => Ok(self.alloc_datum(datum_bool(self.keyboard_manager.is_alt_down()))),
            "key" => Ok(self.alloc_datum(Datum::String(self.keyboard_manager.key()))),
            "floatPrecision" => Ok(self.alloc_datum(Datum::Int(self.float_precision as i32))),
            "doubleClick" => Ok(self.alloc_datum(datum_bool(self.is_double_click))),
            "ticks" => Ok(self.alloc_datum(Datum::Int(get_elapsed_ticks(self.start_time)))),
            "frameLabel" => {
                let frame_label = self
                    .movie
                    .score
                    .frame_labels
                    .iter()
                    .filter(|&label| label.frame_num <= self.movie.current_frame as i32)
                    .max_by_key(|label| label.frame_num)
                    .map(|label| label.label.clone());
                Ok(self.alloc_datum(Datum::String(
                    frame_label.unwrap_or_else(|| "0".to_string()),
                )))
            }
            "currentSpriteNum" => {
                let script_instance_ref = self
                    .scopes
                    .get(self.current_scope_ref())
                    .and_then(|scope| scope.receiver.clone());

                let datum_ref = script_instance_ref
                    .and_then(|x| script_get_prop_opt(self, &x, &"spriteNum".to_owned()));
                if let Some(datum_ref) = datum_ref {
                    let datum = self.get_datum(&datum_ref);
                    let sprite_num = datum.int_value()?;
                    Ok(self.alloc_datum(Datum::Int(sprite_num)))
                } else {
                    Ok(self.alloc_datum(Datum::Int(0)))
                }
            }
            "actorList" => Ok(self
                .globals
                .get("actorList")
                .unwrap_or(&DatumRef::Void)
                .clone()),
            _ => {
                let datum = self.movie.get_prop(prop)?;
                Ok(self.alloc_datum(datum))
            }
        }
    }

    fn get_player_prop(&mut self, prop: &String) -> Result<DatumRef, ScriptError> {
        match prop.as_str() {
            "traceScript" => Ok(self.alloc_datum(datum_bool(false))), // TODO
            "productVersion" => Ok(self.alloc_datum(Datum::String("10.1".to_string()))), // TODO
            _ => Err(ScriptError::new(format!("Unknown player prop {}", prop))),
        }
    }

    fn set_player_prop(&mut self, prop: &String, _value: &DatumRef) -> Result<(), ScriptError> {
        match prop.as_str() {
            "traceScript" => Ok(()), // TODO
            _ => Err(ScriptError::new(format!("Cannot set player prop {}", prop))),
        }
    }

    fn get_anim_prop(&self, prop_id: u16) -> Result<Datum, ScriptError> {
        let prop_name = get_anim_prop_name(prop_id);
        match prop_name.as_str() {
            "colorDepth" => Ok(Datum::Int(32)),
            "timer" => Ok(Datum::Int(get_elapsed_ticks(self.start_time))),
            _ => Err(ScriptError::new(format!("Unknown anim prop {}", prop_name))),
        }
    }

    fn get_anim2_prop(&self, prop_id: u16) -> Result<Datum, ScriptError> {
        let prop_name = get_anim2_prop_name(prop_id);
        match prop_name.as_str() {
            "number of castLibs" => Ok(Datum::Int(self.movie.cast_manager.casts.len() as i32)),
            "number of castMembers" => Ok(Datum::Int(
                self.movie
                    .cast_manager
                    .casts
                    .iter()
                    .map(|cast_lib| cast_lib.members.len() as i32)
                    .sum(),
            )),
            _ => Err(ScriptError::new(format!(
                "Unknown anim2 prop {}",
                prop_name
            ))),
        }
    }

    fn set_movie_prop(&mut self, prop: &str, value: Datum) -> Result<(), ScriptError> {
        match prop {
            "keyboardFocusSprite" => {
                self.keyboard_focus_sprite = value.int_value()? as i16;
                Ok(())
            }
            "selStart" => {
                self.text_selection_start = value.int_value()? as u16;
                Ok(())
            }
            "selEnd" => {
                self.text_selection_end = value.int_value()? as u16;
                Ok(())
            }
            "floatPrecision" => {
                self.float_precision = value.int_value()? as u8;
                Ok(())
            }
            "centerStage" => Ok(()), // TODO
            "actorList" => match value {
                Datum::List(list_type, list_items, sorted) => {
                    let new_actor_list =
                        self.alloc_datum(Datum::List(list_type, list_items, sorted));
                    self.globals.insert("actorList".to_string(), new_actor_list);
                    Ok(())
                }
                _ => Err(ScriptError::new("actorList must be a list".to_string())),
            },
            _ => self.movie.set_prop(prop, value, &self.allocator),
        }
    }

    fn on_script_error(&mut self, err: &ScriptError) {
        warn!("[!!] play failed with error: {}", err.message);
        self.last_script_error = Some(err.message.clone());
        self.stop();
    }

    fn get_ctx_current_bytecode<'a>(&'a self, ctx: &'a BytecodeHandlerContext) -> &'a Bytecode {
        let scope = self.scopes.get(ctx.scope_ref).unwrap();
        let bytecode_index = scope.bytecode_index;
        let handler_def = unsafe { &*ctx.handler_def_ptr };
        handler_def.bytecode_array.get(bytecode_index).unwrap()
    }

    pub fn push_scope(&mut self) -> ScopeRef {
        if (self.scope_count + 1) as usize >= MAX_STACK_SIZE {
            panic!("Stack overflow");
        }
        let scope_ref = self.scope_count;
        let scope = self.scopes.get_mut(scope_ref as ScopeRef).unwrap();
        scope.reset();
        self.scope_count += 1;
        scope_ref as ScopeRef
    }

    pub fn pop_scope(&mut self) {
        self.scope_count -= 1;
    }

    pub fn current_scope_ref(&self) -> ScopeRef {
        (self.scope_count - 1) as ScopeRef
    }

    // Lingo: sound(channelNum)
    pub fn get_sound_channel(&mut self, channel_num: i32) -> Result<DatumRef, ScriptError> {
        let channel_idx = (channel_num - 1) as usize;
        Ok(self.alloc_datum(Datum::SoundChannel(channel_idx as u16)))
    }

    // Lingo: puppetSound channelNum, memberRef
    pub fn puppet_sound(
        &mut self,
        channel_num: i32,
        member_ref: DatumRef,
    ) -> Result<(), ScriptError> {
        let sound_channel = self.get_sound_channel(channel_num)?;
        SoundChannelDatumHandlers::handle_play_file(self, &sound_channel, &member_ref)
    }

    // Lingo: sound stop channelNum
    pub fn sound_stop(&mut self, channel_num: i32) -> Result<(), ScriptError> {
        let sound_channel = self.get_sound_channel(channel_num)?;
        SoundChannelDatumHandlers::handle_stop(self, &sound_channel)
    }

    pub fn load_sound_member(&self, _member_ref: &DatumRef) -> Result<AudioData, ScriptError> {
        Err(ScriptError::new("Not implemented".to_string()))
    }
}

thread_local! {
    static PLAYER: RefCell<Option<DirPlayer>> = RefCell::new(None);
    /// Paired with `DatumAllocator::rx`: lets `DatumRef`/`ScriptInstanceRef`
    /// `Drop` impls notify the allocator of a ref-count change without
    /// needing access to `player`, which they can't borrow from `Drop`.
    static ALLOCATOR_TX: RefCell<Option<Sender<DatumAllocatorEvent>>> = RefCell::new(None);
}

/// Installs a fresh `DirPlayer` as the thread's active player. Every
/// `Engine` method runs on the thread that called `Engine::load`, so this
/// stays confined to one OS thread and needs no synchronization.
pub fn init_player(config: EngineConfig, net_provider: Arc<dyn NetProvider>, debug_tap: Box<dyn DebugTap>) {
    let player = DirPlayer::new(config, net_provider, debug_tap);
    ALLOCATOR_TX.with(|cell| {
        *cell.borrow_mut() = Some(player.allocator.tx.clone());
    });
    PLAYER.with(|cell| {
        *cell.borrow_mut() = Some(player);
    });
}

pub fn init_player_default() {
    init_player(
        EngineConfig::default(),
        Arc::new(FileNetProvider),
        Box::new(NullDebugTap::default()),
    );
}

pub fn player_alloc_datum(datum: Datum) -> DatumRef {
    reserve_player_mut(|player| player.alloc_datum(datum))
}

#[derive(Debug, PartialEq, Eq)]
pub enum ScriptErrorCode {
    HandlerNotFound,
    Generic,
}

#[derive(Debug)]
pub struct ScriptError {
    pub code: ScriptErrorCode,
    pub message: String,
}

impl ScriptError {
    pub fn new(message: String) -> ScriptError {
        Self::new_code(ScriptErrorCode::Generic, message)
    }

    pub fn new_code(code: ScriptErrorCode, message: String) -> ScriptError {
        ScriptError { code, message }
    }
}

pub fn player_handle_scope_return(scope: &ScopeResult) {
    if scope.passed {
        reserve_player_mut(|player| {
            let scope_ref = player.current_scope_ref();
            let last_scope = player.scopes.get_mut(scope_ref);
            if let Some(last_scope) = last_scope {
                last_scope.passed = true;
            }
        });
    }
}

fn player_call_global_handler(
    handler_name: &String,
    args: &Vec<DatumRef>,
) -> Result<DatumRef, ScriptError> {
    let mut receiver_handler = None;

    // "new" invocations should always go through the built-in handler
    if handler_name != "new" {
        // Director appears to support customFunc(firstArg, ..) invocations
        // where firstArg is a script or script instance
        receiver_handler = ScriptInstanceUtils::get_handler_from_first_arg(&args, handler_name);

        if receiver_handler.is_none() {
            receiver_handler = reserve_player_ref(|player| {
                player
                    .movie
                    .score
                    .get_active_script_instance_list()
                    .iter()
                    .find_map(|instance_receiver_ref| {
                        let script_instance =
                            player.allocator.get_script_instance(instance_receiver_ref);
                        let script = player
                            .movie
                            .cast_manager
                            .get_script_by_ref(&script_instance.script)
                            .unwrap();
                        script
                            .get_own_handler_ref(&handler_name)
                            .map(|handler_pair| (Some(instance_receiver_ref.clone()), handler_pair))
                    })
            });
        }

        if receiver_handler.is_none() {
            receiver_handler = reserve_player_ref(|player| {
                get_active_static_script_refs(&player.movie, &player.get_hydrated_globals())
                    .iter()
                    .find_map(|script_ref| {
                        let script = player.movie.cast_manager.get_script_by_ref(script_ref);
                        script
                            .and_then(|x| x.get_own_handler_ref(&handler_name))
                            .map(|handler_pair| (None, handler_pair))
                    })
            });
        }
    }

    if let Some(receiver_handler) = receiver_handler {
        let receiver = receiver_handler.0;
        let handler_ref = receiver_handler.1;
        let scope =
            player_call_script_handler_raw_args(receiver, handler_ref.to_owned(), args, true)?;
        player_handle_scope_return(&scope);
        return Ok(scope.return_value);
    } else if BuiltInHandlerManager::has_async_handler(handler_name) {
        return BuiltInHandlerManager::call_async_handler(handler_name, args);
    } else {
        return BuiltInHandlerManager::call_handler(handler_name, args);
    }
}

pub fn reserve_player_ref<T, F>(callback: F) -> T
where
    F: FnOnce(&DirPlayer) -> T,
{
    PLAYER.with(|cell| {
        let player = cell.borrow();
        callback(player.as_ref().expect("player not initialized"))
    })
}

pub fn reserve_player_mut<T, F>(callback: F) -> T
where
    F: FnOnce(&mut DirPlayer) -> T,
{
    PLAYER.with(|cell| {
        let mut player = cell.borrow_mut();
        callback(player.as_mut().expect("player not initialized"))
    })
}

#[allow(dead_code)]
#[derive(Clone)]
pub enum ScriptReceiver {
    Script(CastMemberRef),
    ScriptInstance(ScriptInstanceRef),
}

pub fn player_call_script_handler(
    receiver: Option<ScriptInstanceRef>,
    handler_ref: ScriptHandlerRef,
    arg_list: &Vec<DatumRef>,
) -> Result<ScopeResult, ScriptError> {
    player_call_script_handler_raw_args(receiver, handler_ref, arg_list, false)
}

pub fn player_call_script_handler_raw_args(
    receiver: Option<ScriptInstanceRef>,
    handler_ref: ScriptHandlerRef,
    arg_list: &Vec<DatumRef>,
    use_raw_arg_list: bool,
) -> Result<ScopeResult, ScriptError> {
    let (script_member_ref, handler_name) = &handler_ref;
    let (scope_ref, handler_ptr, script_ptr) = reserve_player_mut(|player| {
        let (script_ptr, handler_ptr, handler_name_id, script_type) = {
            let script_rc = player
                .movie
                .cast_manager
                .get_script_by_ref(&script_member_ref)
                .unwrap();
            let script = script_rc.as_ref();
            let script_ptr = script as *const Script;
            let handler = script.get_own_handler(&handler_name);

            if let Some(handler_rc) = handler {
                let handler_name_id = handler_rc.name_id;
                let handler_ptr: *const HandlerDef = handler_rc.as_ref();
                Ok((script_ptr, handler_ptr, handler_name_id, script.script_type))
            } else {
                Err(ScriptError::new_code(
                    ScriptErrorCode::HandlerNotFound,
                    format!(
                        "Handler {handler_name} not found for script {}",
                        script.name
                    ),
                ))
            }
        }?;

        let receiver_arg = if let Some(script_instance_ref) = receiver.as_ref() {
            Some(Datum::ScriptInstanceRef(script_instance_ref.clone()))
        } else if script_type != ScriptType::Movie {
            Some(Datum::ScriptRef(handler_ref.0.clone()))
        } else {
            None
        };

        let scope_ref = player.push_scope();
        {
            let scope = player.scopes.get_mut(scope_ref).unwrap();
            scope.script_ref = script_member_ref.clone();
            scope.receiver = receiver;
            scope.handler_name_id = handler_name_id;
        };

        if let Some(receiver_arg) = receiver_arg {
            if !use_raw_arg_list {
                let arg_ref = player.alloc_datum(receiver_arg);
                let scope = player.scopes.get_mut(scope_ref).unwrap();
                scope.args.push(arg_ref);
            }
        }

        let scope = player.scopes.get_mut(scope_ref).unwrap();
        scope.args.extend_from_slice(arg_list);

        Ok((scope_ref, handler_ptr, script_ptr))
    })?;

    let ctx = BytecodeHandlerContext {
        scope_ref,
        handler_def_ptr: handler_ptr,
        script_ptr,
    };

    let mut should_return = false;

    loop {
        let result = player_execute_bytecode(&ctx)?;

        match result {
            HandlerExecutionResult::Advance => {
                reserve_player_mut(|player| {
                    player.scopes.get_mut(scope_ref).unwrap().bytecode_index += 1;
                });
            }
            HandlerExecutionResult::Stop => {
                should_return = true;
            }
            HandlerExecutionResult::Error(err) => {
                return Err(err);
            }
            HandlerExecutionResult::Jump => {}
        }

        if should_return {
            break;
        }
    }

    let scope = reserve_player_mut(|player| {
        let result = {
            let scope = player.scopes.get(scope_ref).unwrap();
            player.last_handler_result = scope.return_value.clone();

            ScopeResult {
                passed: scope.passed,
                return_value: scope.return_value.clone(),
            }
        };
        player.pop_scope();
        result
    });

    return Ok(scope);
}

pub fn player_is_playing() -> bool {
    reserve_player_ref(|player| player.is_playing)
}

fn get_active_static_script_refs<'a>(
    movie: &'a Movie,
    globals: &'a FxHashMap<String, &'a Datum>,
) -> Vec<CastMemberRef> {
    let frame_script = movie.score.get_script_in_frame(movie.current_frame);
    let movie_scripts = movie.cast_manager.get_movie_scripts();

    let mut active_script_refs: Vec<CastMemberRef> = vec![];
    for script in movie_scripts {
        active_script_refs.push(script.member_ref.clone());
    }
    if let Some(frame_script) = frame_script {
        active_script_refs.push(CastMemberRef {
            cast_lib: frame_script.cast_lib.into(),
            cast_member: frame_script.cast_member.into(),
        });
    }
    for global in globals.values() {
        if let Datum::VarRef(VarRef::Script(script_ref)) = global {
            active_script_refs.push(script_ref.clone());
        }
    }
    return active_script_refs;
}

fn player_ext_call<'a>(
    name: String,
    args: &Vec<DatumRef>,
    scope_ref: ScopeRef,
) -> (HandlerExecutionResult, DatumRef) {
    match name.as_str() {
        "return" => {
            let return_value = if let Some(return_value) = args.first() {
                reserve_player_mut(|player| {
                    player.scopes.get_mut(scope_ref).unwrap().return_value = return_value.clone();
                });
                return_value.clone()
            } else {
                DatumRef::Void
            };
            (HandlerExecutionResult::Stop, return_value)
        }
        _ => {
            let result = player_call_global_handler(&name, args);

            match result {
                Ok(result_datum_ref) => {
                    reserve_player_mut(|player| {
                        player.last_handler_result = result_datum_ref.clone();
                        player.scopes.get_mut(scope_ref).unwrap().return_value =
                            result_datum_ref.clone();
                    });
                    (HandlerExecutionResult::Advance, result_datum_ref)
                }
                Err(err) => (HandlerExecutionResult::Error(err), DatumRef::Void),
            }
        }
    }
}

fn player_duplicate_datum(datum: &DatumRef) -> DatumRef {
    let datum_type = reserve_player_ref(|player| player.get_datum(datum).type_enum());
    let new_datum = match datum_type {
        DatumType::PropList => {
            let (props, sorted) = reserve_player_mut(|player| {
                let (props, sorted) = player.get_datum(datum).to_map_tuple().unwrap();
                (props.clone(), sorted)
            });
            let mut new_props = Vec::new();
            for (key, value) in props {
                let new_key = player_duplicate_datum(&key);
                let new_value = player_duplicate_datum(&value);
                new_props.push((new_key, new_value));
            }
            Datum::PropList(new_props, sorted)
        }
        DatumType::List => {
            let (list_type, list, sorted) = reserve_player_ref(|player| {
                let (a, b, c) = player.get_datum(datum).to_list_tuple().unwrap();
                (a.clone(), b.clone(), c)
            });
            let mut new_list = Vec::new();
            for item in list {
                let new_item = player_duplicate_datum(&item);
                new_list.push(new_item);
            }
            Datum::List(list_type.clone(), new_list, sorted)
        }
        DatumType::BitmapRef => {
            // No pixel data to deep-copy; bitmaps are opaque placeholder
            // handles, so duplicating one just clones the handle.
            reserve_player_ref(|player| player.get_datum(datum).clone())
        }
        _ => reserve_player_ref(|player| player.get_datum(datum).clone()),
    };
    let new_datum_ref = player_alloc_datum(new_datum);
    new_datum_ref
}
