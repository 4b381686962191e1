//! The crate's public surface (`spec.md` §6): a handle over the frame loop,
//! event dispatcher and VM, plus the render boundary (`FrameSnapshot`).
//!
//! State lives in the thread-local `DirPlayer` (see `reserve_player_ref`/
//! `reserve_player_mut` in the parent module); `Engine` is a thin handle onto
//! it rather than an owning struct. Threading a `VmContext` through every one
//! of the ~40 call sites the teacher's singleton touches would be a much
//! larger rewrite than this exercise calls for, so the singleton is kept and
//! confined to a single OS thread per `Engine` instead — `Engine::load` and
//! every other method below must be called from the same thread.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use url::Url;

use crate::{
    config::{DebugTap, EngineConfig, NullDebugTap},
    director::{file::read_director_file_bytes, lingo::datum::Datum},
    error::ContainerError,
};

use super::{
    allocator::{player_run_allocator_cycle, ScriptInstanceAllocatorTrait},
    cast_member::CastMemberType,
    datum_ref::DatumRef,
    events::{
        player_dispatch_callback_event, player_dispatch_event_to_sprite,
        player_dispatch_global_event, player_dispatch_targeted_event, player_invoke_global_event,
        player_unwrap_result,
    },
    handlers::datum_handlers::player_call_datum_handler,
    init_player,
    keyboard_events::{player_key_down, player_key_up},
    net_manager::{FileNetProvider, NetProvider},
    player_alloc_datum, player_call_script_handler, player_is_playing, reserve_player_mut,
    reserve_player_ref,
    score::{concrete_sprite_hit_test, get_sprite_at},
    ScriptReceiver,
};

/// Per-tick boundary to the renderer (`spec.md` §6). The core neither
/// rasterises nor composes; a host renderer reads this and draws.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub frame_number: u32,
    pub background_color: (u8, u8, u8),
    pub sprites: Vec<RenderSprite>,
}

#[derive(Debug, Clone)]
pub struct RenderSprite {
    pub channel: usize,
    pub member_type: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
    pub h: i32,
    pub visible: bool,
    pub fore_color: i32,
    pub back_color: i32,
    pub ink: i32,
    pub cast_lib: i32,
    pub cast_member_id: i32,
}

pub struct Engine {
    preloaded_after_frame_one: bool,
}

impl Engine {
    /// Loads a movie from an in-memory container with default configuration,
    /// a `file://`-only net provider and no debug tap.
    pub fn load(bytes: &[u8]) -> Result<Engine, ContainerError> {
        Self::load_with(
            bytes,
            EngineConfig::default(),
            Arc::new(FileNetProvider),
            Box::new(NullDebugTap::default()),
        )
    }

    pub fn load_with(
        bytes: &[u8],
        config: EngineConfig,
        net_provider: Arc<dyn NetProvider>,
        debug_tap: Box<dyn DebugTap>,
    ) -> Result<Engine, ContainerError> {
        init_player(config, net_provider, debug_tap);
        let movie_file = read_director_file_bytes(&bytes.to_vec(), "movie", "")?;
        reserve_player_mut(|player| player.load_movie_from_dir(movie_file));
        Ok(Engine {
            preloaded_after_frame_one: false,
        })
    }

    pub fn play(&mut self) {
        reserve_player_mut(|player| player.play());
    }

    pub fn stop(&mut self) {
        reserve_player_mut(|player| player.stop());
    }

    pub fn reset(&mut self) {
        reserve_player_mut(|player| player.reset());
        self.preloaded_after_frame_one = false;
    }

    pub fn is_playing(&self) -> bool {
        player_is_playing()
    }

    pub fn set_external_params(&mut self, params: HashMap<String, String>) {
        reserve_player_mut(|player| player.external_params = params);
    }

    pub fn set_base_path(&mut self, base_path: &str) -> Result<(), url::ParseError> {
        let url = Url::parse(base_path)?;
        reserve_player_mut(|player| player.net_manager.set_base_path(url));
        Ok(())
    }

    pub fn set_stage_size(&mut self, width: u32, height: u32) {
        reserve_player_mut(|player| player.stage_size = (width, height));
    }

    /// Fires a global (movie/frame/instance-targeted) event by name, e.g. a
    /// host-driven `"startMovie"` or a custom message.
    pub fn dispatch_event(&mut self, name: &str, args: Vec<DatumRef>) {
        player_dispatch_global_event(&name.to_string(), &args);
    }

    pub fn mouse_down(&mut self, x: i32, y: i32) {
        if !player_is_playing() {
            return;
        }
        let instance_ids = reserve_player_mut(|player| {
            let now = Local::now().timestamp_millis().abs();
            let is_double_click = (now - player.last_mouse_down_time) < 500;
            player.mouse_loc = (x, y);
            player.is_double_click = is_double_click;
            player.last_mouse_down_time = now;
            let sprite_number = get_sprite_at(player, x, y, true);
            if let Some(sprite_number) = sprite_number {
                let sprite = player.movie.score.get_sprite(sprite_number as i16);
                let sprite_member = sprite
                    .and_then(|s| s.member.as_ref())
                    .and_then(|m| player.movie.cast_manager.find_member_by_ref(m));
                if let Some(sprite_member) = sprite_member {
                    if let CastMemberType::Field(field_member) = &sprite_member.member_type {
                        if field_member.editable {
                            player.keyboard_focus_sprite = sprite_number as i16;
                        }
                    }
                }
                player.mouse_down_sprite = sprite_number as i16;
                sprite.map(|s| s.script_instance_list.clone())
            } else {
                None
            }
        });
        player_dispatch_targeted_event(&"mouseDown".to_string(), &vec![], instance_ids.as_ref());
    }

    pub fn mouse_up(&mut self, x: i32, y: i32) {
        if !player_is_playing() {
            return;
        }
        let result = reserve_player_mut(|player| {
            player.mouse_loc = (x, y);
            let sprite = if player.mouse_down_sprite > 0 {
                player.movie.score.get_sprite(player.mouse_down_sprite)
            } else {
                None
            };
            player.mouse_down_sprite = -1;
            sprite.map(|s| {
                let is_inside = concrete_sprite_hit_test(player, s, x, y);
                (s.script_instance_list.clone(), is_inside)
            })
        });
        let is_inside = result.as_ref().map(|r| r.1).unwrap_or(true);
        let instance_ids = result.as_ref().map(|r| &r.0);
        let event_name = if is_inside { "mouseUp" } else { "mouseUpOutSide" };
        player_dispatch_targeted_event(&event_name.to_string(), &vec![], instance_ids);
        reserve_player_mut(|player| player.is_double_click = false);
    }

    pub fn mouse_move(&mut self, x: i32, y: i32) {
        if !player_is_playing() {
            return;
        }
        let (sprite_num, hovered_sprite) = reserve_player_mut(|player| {
            player.mouse_loc = (x, y);
            let hovered_sprite = player.hovered_sprite;
            let sprite_num = get_sprite_at(player, x, y, false);
            if let Some(sprite_num) = sprite_num {
                player.hovered_sprite = Some(sprite_num as i16);
            }
            (sprite_num, hovered_sprite)
        });
        let Some(sprite_num) = sprite_num else {
            return;
        };
        let hovered_sprite = hovered_sprite.unwrap_or(-1);
        if hovered_sprite != sprite_num as i16 {
            if hovered_sprite != -1 {
                player_dispatch_event_to_sprite(
                    &"mouseLeave".to_string(),
                    &vec![],
                    hovered_sprite as u16,
                );
            }
            player_dispatch_event_to_sprite(&"mouseEnter".to_string(), &vec![], sprite_num as u16);
        } else {
            player_dispatch_event_to_sprite(&"mouseWithin".to_string(), &vec![], sprite_num as u16);
        }
    }

    pub fn key_down(&mut self, key: String, code: u16) {
        player_unwrap_result(player_key_down(key, code));
    }

    pub fn key_up(&mut self, key: String, code: u16) {
        player_unwrap_result(player_key_up(key, code));
    }

    /// Calls the movie's `alertHook`, if one is set, with a generic script
    /// error message. Mirrors Director's behaviour of routing otherwise
    /// user-invisible script errors through an author-installed handler.
    pub fn trigger_alert_hook(&mut self) {
        let call_params = reserve_player_mut(|player| {
            let arg_list = vec![
                player.alloc_datum(Datum::String("Script Error".to_string())),
                player.alloc_datum(Datum::String("An error occurred in the script".to_string())),
            ];
            let alert_hook = player.movie.alert_hook.clone()?;
            let (receiver, script_ref) = match &alert_hook {
                ScriptReceiver::ScriptInstance(instance_ref) => {
                    let script_instance = player.allocator.get_script_instance(instance_ref);
                    (Some(instance_ref.clone()), script_instance.script.clone())
                }
                ScriptReceiver::Script(script_ref) => (None, script_ref.clone()),
            };
            let script = player.movie.cast_manager.get_script_by_ref(&script_ref)?;
            let handler = script.get_own_handler_ref(&"alertHook".to_string())?;
            Some((receiver, handler, arg_list))
        });
        if let Some((receiver, handler, args)) = call_params {
            if let Err(err) = player_call_script_handler(receiver, handler, &args) {
                reserve_player_mut(|player| player.on_script_error(&err));
            }
        }
    }

    /// Advances the player by one frame: polls outstanding net tasks and due
    /// timeouts, ticks the sound manager, then runs the fixed `prepareFrame`
    /// / `enterFrame` / actor `stepFrame` / `exitFrame` sequence from
    /// `spec.md` §5 before moving `current_frame` forward.
    pub fn tick(&mut self) {
        let now_ms = reserve_player_ref(|player| {
            Local::now()
                .signed_duration_since(player.start_time)
                .num_milliseconds()
        });

        player_run_allocator_cycle();
        reserve_player_mut(|player| player.net_manager.poll_tasks());
        reserve_player_ref(|player| player.sound_manager.update(player));

        let due_timeouts = reserve_player_mut(|player| player.timeout_manager.poll_due(now_ms));
        for timeout_name in due_timeouts {
            self.fire_timeout(timeout_name);
        }

        let is_playing = reserve_player_ref(|player| player.is_playing);
        if !is_playing {
            return;
        }
        let is_script_paused = reserve_player_ref(|player| player.is_script_paused);
        if is_script_paused {
            return;
        }

        player_unwrap_result(player_invoke_global_event(&"prepareFrame".to_string(), &vec![]));
        player_unwrap_result(player_invoke_global_event(&"enterFrame".to_string(), &vec![]));
        self.step_actors();

        let is_playing = reserve_player_ref(|player| player.is_playing);
        if !is_playing {
            return;
        }
        let frame_skipped = reserve_player_ref(|player| player.next_frame.is_some());
        if !frame_skipped {
            player_unwrap_result(player_invoke_global_event(&"exitFrame".to_string(), &vec![]));
        }

        let prev_frame = reserve_player_ref(|player| player.movie.current_frame);
        reserve_player_mut(|player| player.advance_frame());
        let new_frame = reserve_player_ref(|player| player.movie.current_frame);

        if !self.preloaded_after_frame_one && new_frame > 1 && prev_frame <= 1 {
            reserve_player_mut(|player| {
                player
                    .movie
                    .cast_manager
                    .preload_casts(&mut player.net_manager);
            });
            self.preloaded_after_frame_one = true;
        }
    }

    fn step_actors(&mut self) {
        let actor_list_snapshot = reserve_player_ref(|player| {
            let actor_list_ref = player.globals.get("actorList").cloned().unwrap_or(DatumRef::Void);
            match player.get_datum(&actor_list_ref) {
                Datum::List(_, items, _) => items.clone(),
                _ => vec![],
            }
        });
        for actor_ref in actor_list_snapshot.iter() {
            let still_active = reserve_player_ref(|player| {
                let actor_list_ref =
                    player.globals.get("actorList").cloned().unwrap_or(DatumRef::Void);
                match player.get_datum(&actor_list_ref) {
                    Datum::List(_, items, _) => items.contains(actor_ref),
                    _ => false,
                }
            });
            if !still_active {
                continue;
            }
            if let Err(err) = player_call_datum_handler(actor_ref, &"stepFrame".to_string(), &vec![]) {
                reserve_player_mut(|player| player.on_script_error(&err));
                return;
            }
        }
    }

    fn fire_timeout(&mut self, timeout_name: String) {
        let timeout_info = reserve_player_ref(|player| {
            player
                .timeout_manager
                .get_timeout(&timeout_name)
                .map(|t| (t.target_ref.clone(), t.handler.clone()))
        });
        let Some((target_ref, handler_name)) = timeout_info else {
            return;
        };
        let ref_datum = player_alloc_datum(Datum::TimeoutRef(timeout_name));
        let args = vec![ref_datum];
        if target_ref != DatumRef::Void {
            player_dispatch_callback_event(target_ref, &handler_name, &args);
        } else {
            player_dispatch_global_event(&handler_name, &args);
        }
    }

    /// Snapshots the Score's visible sprite channels for the current frame.
    pub fn frame_snapshot(&self) -> FrameSnapshot {
        reserve_player_ref(|player| {
            let (r, g, b) = player.movie.stage_color;
            let sprites = player
                .movie
                .score
                .channels
                .iter()
                .map(|channel| {
                    let sprite = &channel.sprite;
                    let (cast_lib, cast_member_id) = sprite
                        .member
                        .as_ref()
                        .map(|m| (m.cast_lib, m.cast_member))
                        .unwrap_or((0, 0));
                    let type_id = sprite
                        .member
                        .as_ref()
                        .and_then(|m| player.movie.cast_manager.find_member_by_ref(m))
                        .map(|m| m.member_type.member_type_id());
                    let member_type = type_id
                        .as_ref()
                        .and_then(|t| t.symbol_string().ok())
                        .unwrap_or("unknown")
                        .to_string();
                    RenderSprite {
                        channel: channel.number,
                        member_type,
                        x: sprite.loc_h,
                        y: sprite.loc_v,
                        z: sprite.loc_z,
                        w: sprite.width,
                        h: sprite.height,
                        visible: sprite.visible,
                        fore_color: sprite.fore_color,
                        back_color: sprite.back_color,
                        ink: sprite.ink,
                        cast_lib,
                        cast_member_id,
                    }
                })
                .collect();
            FrameSnapshot {
                frame_number: player.movie.current_frame,
                background_color: (r, g, b),
                sprites,
            }
        })
    }
}
