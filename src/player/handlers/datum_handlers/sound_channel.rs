use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    director::lingo::datum::{Datum, DatumType},
    player::{cast_member::CastMemberType, DatumRef, DirPlayer, ScriptError},
};

/// Ticks per second the frame loop advances sound channels at.
const TICKS_PER_SECOND: f32 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SoundStatus {
    Stopped = 0,
    Playing = 1,
    Paused = 2,
}

/// Metadata-only stand-in for a resolved sound member. Decoding and mixing
/// the sample data are out of scope, so no samples are kept here.
#[derive(Clone, Debug)]
pub struct AudioData {
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_ms: u32,
}

#[derive(Clone, Debug)]
pub struct SoundSegment {
    pub member_ref: DatumRef,
    pub loop_count: i32,
    pub loops_remaining: i32,
}

struct Fade {
    start_volume: f32,
    to_volume: f32,
    total_ticks: i32,
    remaining_ticks: i32,
}

pub struct SoundChannel {
    pub channel_num: i32,
    pub status: SoundStatus,
    pub volume: f32,
    pub pan: f32,
    pub loop_count: i32,
    pub loops_remaining: i32,
    pub start_time: f32,
    pub end_time: f32,
    pub loop_start_time: f32,
    pub loop_end_time: f32,
    pub elapsed_time: f32,
    pub sample_rate: u32,
    pub sample_count: u32,
    pub channel_count: u16,
    pub current_member: Option<DatumRef>,
    pub playlist: Vec<DatumRef>,
    pub playlist_segments: Vec<SoundSegment>,
    pub current_segment_index: Option<usize>,
    fade: Option<Fade>,
}

impl SoundChannel {
    pub fn new(channel_num: i32) -> Self {
        SoundChannel {
            channel_num,
            status: SoundStatus::Stopped,
            volume: 255.0,
            pan: 0.0,
            loop_count: 1,
            loops_remaining: 1,
            start_time: 0.0,
            end_time: 0.0,
            loop_start_time: 0.0,
            loop_end_time: 0.0,
            elapsed_time: 0.0,
            sample_rate: 0,
            sample_count: 0,
            channel_count: 0,
            current_member: None,
            playlist: vec![],
            playlist_segments: vec![],
            current_segment_index: None,
            fade: None,
        }
    }

    fn duration_for_member(player: &DirPlayer, member_ref: &DatumRef) -> f32 {
        Self::sound_member_for(player, member_ref)
            .map(|m| m.duration_ms as f32 / 1000.0)
            .unwrap_or(0.0)
    }

    fn sound_member_for<'a>(
        player: &'a DirPlayer,
        member_ref: &DatumRef,
    ) -> Option<&'a crate::player::cast_member::SoundMember> {
        if let Datum::CastMember(cast_member_ref) = player.get_datum(member_ref) {
            let member = player
                .movie
                .cast_manager
                .find_member_by_ref(cast_member_ref)?;
            if let CastMemberType::Sound(sound) = &member.member_type {
                return Some(sound);
            }
        }
        None
    }

    fn refresh_format(&mut self, player: &DirPlayer, member_ref: &DatumRef) {
        if let Some(sound) = Self::sound_member_for(player, member_ref) {
            self.sample_rate = sound.sample_rate;
            self.channel_count = sound.channels;
            self.sample_count = (sound.duration_ms as u64 * sound.sample_rate as u64 / 1000) as u32;
        } else {
            self.sample_rate = 0;
            self.channel_count = 0;
            self.sample_count = 0;
        }
    }

    fn start_member(&mut self, player: &DirPlayer, member_ref: DatumRef, loops_remaining: i32) {
        self.current_member = Some(member_ref.clone());
        self.elapsed_time = 0.0;
        self.end_time = Self::duration_for_member(player, &member_ref);
        self.refresh_format(player, &member_ref);
        self.loops_remaining = loops_remaining;
        self.status = SoundStatus::Playing;
    }

    pub fn play_member(&mut self, player: &DirPlayer, member_ref: DatumRef, loop_count: i32) {
        self.playlist.clear();
        self.playlist_segments.clear();
        self.current_segment_index = None;
        self.loop_count = loop_count;
        self.start_member(player, member_ref, loop_count);
    }

    pub fn play_file(&mut self, player: &DirPlayer, member_ref: DatumRef) {
        self.play_member(player, member_ref, 1);
    }

    pub fn play(&mut self, player: &DirPlayer) {
        if self.playlist_segments.is_empty() {
            self.status = SoundStatus::Stopped;
            return;
        }
        self.current_segment_index = Some(0);
        let segment = self.playlist_segments[0].clone();
        self.start_member(player, segment.member_ref, segment.loops_remaining);
    }

    pub fn play_next(&mut self, player: &DirPlayer) {
        match self.current_segment_index {
            Some(idx) if idx + 1 < self.playlist_segments.len() => {
                let segment = self.playlist_segments[idx + 1].clone();
                self.current_segment_index = Some(idx + 1);
                self.start_member(player, segment.member_ref, segment.loops_remaining);
            }
            _ => self.stop(),
        }
    }

    pub fn stop(&mut self) {
        self.status = SoundStatus::Stopped;
        self.elapsed_time = 0.0;
        self.current_segment_index = None;
        self.fade = None;
    }

    pub fn pause(&mut self) {
        if self.status == SoundStatus::Playing {
            self.status = SoundStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == SoundStatus::Paused {
            self.status = SoundStatus::Playing;
        }
    }

    pub fn rewind(&mut self) {
        self.elapsed_time = self.start_time;
    }

    pub fn queue_segment(&mut self, segment: SoundSegment, segment_ref: DatumRef) {
        self.playlist.push(segment_ref);
        self.playlist_segments.push(segment);
        if self.current_segment_index.is_none() {
            self.current_segment_index = Some(0);
        }
    }

    pub fn break_loop(&mut self) {
        self.loops_remaining = 0;
    }

    pub fn set_playlist(&mut self, segments: Vec<SoundSegment>, refs: Vec<DatumRef>) {
        self.playlist_segments = segments;
        self.playlist = refs;
        self.current_segment_index = if self.playlist_segments.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    pub fn get_playlist(&self) -> Vec<DatumRef> {
        self.playlist.clone()
    }

    pub fn fade_in(&mut self, ticks: i32, to_volume: f32) {
        self.volume = 0.0;
        self.fade_to(ticks, to_volume);
    }

    pub fn fade_out(&mut self, ticks: i32) {
        self.fade_to(ticks, 0.0);
    }

    pub fn fade_to(&mut self, ticks: i32, to_volume: f32) {
        let ticks = ticks.max(1);
        self.fade = Some(Fade {
            start_volume: self.volume,
            to_volume,
            total_ticks: ticks,
            remaining_ticks: ticks,
        });
    }

    pub fn is_busy(&self) -> bool {
        self.status == SoundStatus::Playing
    }

    pub fn get_duration(&self) -> f32 {
        self.end_time
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 255.0);
    }

    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-100.0, 100.0);
    }

    pub fn set_loop_count(&mut self, count: i32) {
        self.loop_count = count;
        self.loops_remaining = count;
    }

    fn advance_fade(&mut self) {
        let Some(fade) = &mut self.fade else { return };
        fade.remaining_ticks -= 1;
        let progress = 1.0 - (fade.remaining_ticks.max(0) as f32 / fade.total_ticks as f32);
        self.volume = fade.start_volume + (fade.to_volume - fade.start_volume) * progress;
        if fade.remaining_ticks <= 0 {
            self.fade = None;
        }
    }

    /// Advances playback position by one tick (`1 / 60s`). Called from the
    /// frame loop via `SoundManager::update`.
    pub fn advance_tick(&mut self, player: &DirPlayer) {
        if self.status != SoundStatus::Playing {
            return;
        }
        self.advance_fade();
        self.elapsed_time += 1.0 / TICKS_PER_SECOND;
        let end_time = if self.end_time > 0.0 {
            self.end_time
        } else {
            return;
        };
        if self.elapsed_time < end_time {
            return;
        }
        if self.loops_remaining > 1 {
            self.loops_remaining -= 1;
            self.elapsed_time = self.loop_start_time;
        } else if self.loops_remaining < 0 {
            self.elapsed_time = self.loop_start_time;
        } else {
            self.play_next(player);
        }
    }
}

pub struct SoundManager {
    channels: Vec<Rc<RefCell<SoundChannel>>>,
}

impl SoundManager {
    pub fn new(num_channels: usize) -> Result<SoundManager, ScriptError> {
        let channels = (0..num_channels)
            .map(|i| Rc::new(RefCell::new(SoundChannel::new(i as i32 + 1))))
            .collect();
        Ok(SoundManager { channels })
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn get_channel(&self, channel: usize) -> Option<Rc<RefCell<SoundChannel>>> {
        self.channels.get(channel).cloned()
    }

    pub fn get_channel_mut(&mut self, channel: usize) -> Option<Rc<RefCell<SoundChannel>>> {
        self.channels.get(channel).cloned()
    }

    pub fn stop_all(&mut self) {
        for channel in &self.channels {
            channel.borrow_mut().stop();
        }
    }

    /// Advances every channel by one tick. Called once per `Engine::tick`.
    pub fn update(&self, player: &DirPlayer) {
        for channel in &self.channels {
            channel.borrow_mut().advance_tick(player);
        }
    }
}

pub struct SoundChannelDatumHandlers {}

impl SoundChannelDatumHandlers {
    pub fn call(
        player: &mut DirPlayer,
        datum: &DatumRef,
        handler_name: &String,
        args: &Vec<DatumRef>,
    ) -> Result<DatumRef, ScriptError> {
        let handler_name_lower = handler_name.to_lowercase();
        match handler_name_lower.as_str() {
            "play" => {
                if args.is_empty() {
                    Self::handle_play(player, datum)?;
                } else {
                    Self::handle_play_member(player, datum, &args[0])?;
                }
                Ok(datum.clone())
            }
            "playfile" => {
                if args.is_empty() {
                    return Err(ScriptError::new(
                        "playFile requires a member argument".to_string(),
                    ));
                }
                Self::handle_play_file(player, datum, &args[0])?;
                Ok(datum.clone())
            }
            "playnext" => {
                Self::handle_play_next(player, datum)?;
                Ok(datum.clone())
            }
            "stop" => {
                Self::handle_stop(player, datum)?;
                Ok(datum.clone())
            }
            "pause" => {
                Self::handle_pause(player, datum)?;
                Ok(datum.clone())
            }
            "rewind" => {
                Self::handle_rewind(player, datum)?;
                Ok(datum.clone())
            }
            "queue" => {
                if args.is_empty() {
                    return Err(ScriptError::new(
                        "queue requires a member argument".to_string(),
                    ));
                }
                Self::handle_queue(player, datum, &args[0])?;
                Ok(datum.clone())
            }
            "breakloop" => {
                Self::handle_break_loop(player, datum)?;
                Ok(datum.clone())
            }
            "fadein" => {
                let ticks = if args.is_empty() {
                    60
                } else {
                    player.get_datum(&args[0]).int_value()?
                };
                let to_volume = if args.len() > 1 {
                    player.get_datum(&args[1]).float_value()?
                } else {
                    255.0
                };
                Self::handle_fade_in(player, datum, ticks, to_volume)?;
                Ok(datum.clone())
            }
            "fadeout" => {
                let ticks = if args.is_empty() {
                    60
                } else {
                    player.get_datum(&args[0]).int_value()?
                };
                Self::handle_fade_out(player, datum, ticks)?;
                Ok(datum.clone())
            }
            "fadeto" => {
                if args.len() < 2 {
                    return Err(ScriptError::new(
                        "fadeTo requires ticks and volume arguments".to_string(),
                    ));
                }
                let ticks = player.get_datum(&args[0]).int_value()?;
                let to_volume = player.get_datum(&args[1]).float_value()?;
                Self::handle_fade_to(player, datum, ticks, to_volume)?;
                Ok(datum.clone())
            }
            "setplaylist" => {
                if args.is_empty() {
                    return Err(ScriptError::new(
                        "setPlayList requires a list argument".to_string(),
                    ));
                }
                Self::handle_set_playlist(player, datum, &args[0])?;
                Ok(datum.clone())
            }
            "getplaylist" => Self::handle_get_playlist(player, datum),
            "isbusy" => {
                let is_busy = Self::handle_is_busy(player, datum)?;
                Ok(player.alloc_datum(Datum::Int(if is_busy { 1 } else { 0 })))
            }
            _ => Err(ScriptError::new(format!(
                "No handler {handler_name} for sound channel"
            ))),
        }
    }

    pub fn get_prop(
        player: &DirPlayer,
        datum: &DatumRef,
        prop: &String,
    ) -> Result<Datum, ScriptError> {
        let channel_rc = Self::get_sound_channel(player, datum)?;
        let channel = channel_rc.borrow();
        match prop.as_str() {
            "volume" => Ok(Datum::Float(channel.volume)),
            "duration" => Ok(Datum::Float(channel.get_duration())),
            "pan" => Ok(Datum::Float(channel.pan)),
            "loopCount" => Ok(Datum::Int(channel.loop_count)),
            "loopsRemaining" => Ok(Datum::Int(channel.loops_remaining)),
            "startTime" => Ok(Datum::Float(channel.start_time)),
            "endTime" => Ok(Datum::Float(channel.end_time)),
            "loopStartTime" => Ok(Datum::Float(channel.loop_start_time)),
            "loopEndTime" => Ok(Datum::Float(channel.loop_end_time)),
            "elapsedTime" => Ok(Datum::Float(channel.elapsed_time)),
            "sampleRate" => Ok(Datum::Int(channel.sample_rate as i32)),
            "sampleCount" => Ok(Datum::Int(channel.sample_count as i32)),
            "channelCount" => Ok(Datum::Int(channel.channel_count.into())),
            "status" => Ok(Datum::Int(channel.status as i32)),
            _ => Err(ScriptError::new(format!(
                "Cannot get property {} for sound channel",
                prop
            ))),
        }
    }

    pub fn set_prop(
        player: &mut DirPlayer,
        datum: &DatumRef,
        prop: &String,
        value_ref: &DatumRef,
    ) -> Result<(), ScriptError> {
        match prop.as_str() {
            "volume" => {
                let vol = player.get_datum(value_ref).float_value()?;
                Self::set_sound_volume(player, datum, vol)
            }
            "pan" => {
                let pan = player.get_datum(value_ref).float_value()?;
                Self::set_sound_pan(player, datum, pan)
            }
            "loopCount" => {
                let count = player.get_datum(value_ref).int_value()?;
                Self::set_loop_count(player, datum, count)
            }
            "startTime" => {
                let time = player.get_datum(value_ref).float_value()?;
                Self::set_start_time(player, datum, time)
            }
            "endTime" => {
                let time = player.get_datum(value_ref).float_value()?;
                Self::set_end_time(player, datum, time)
            }
            "loopStartTime" => {
                let time = player.get_datum(value_ref).float_value()?;
                Self::set_loop_start_time(player, datum, time)
            }
            "loopEndTime" => {
                let time = player.get_datum(value_ref).float_value()?;
                Self::set_loop_end_time(player, datum, time)
            }
            _ => Err(ScriptError::new(format!(
                "Cannot set property {} for sound channel",
                prop
            ))),
        }
    }

    fn get_channel_index(datum: &DatumRef, player: &DirPlayer) -> Result<usize, ScriptError> {
        match player.get_datum(datum) {
            Datum::SoundChannel(channel_num) => {
                if *channel_num == 0 {
                    return Err(ScriptError::new(
                        "Sound channel index must be >= 1".to_string(),
                    ));
                }
                Ok((*channel_num - 1) as usize)
            }
            _ => Err(ScriptError::new(
                "Expected sound channel reference".to_string(),
            )),
        }
    }

    fn get_sound_channel(
        player: &DirPlayer,
        datum: &DatumRef,
    ) -> Result<Rc<RefCell<SoundChannel>>, ScriptError> {
        let channel_idx = Self::get_channel_index(datum, player)?;
        player
            .sound_manager
            .get_channel(channel_idx)
            .ok_or_else(|| ScriptError::new(format!("Invalid sound channel {}", channel_idx + 1)))
    }

    fn get_sound_channel_mut(
        player: &mut DirPlayer,
        datum: &DatumRef,
    ) -> Result<Rc<RefCell<SoundChannel>>, ScriptError> {
        let channel_idx = Self::get_channel_index(datum, player)?;
        player
            .sound_manager
            .get_channel_mut(channel_idx)
            .ok_or_else(|| ScriptError::new(format!("Invalid sound channel {}", channel_idx + 1)))
    }

    fn handle_play_member(
        player: &mut DirPlayer,
        datum: &DatumRef,
        member_ref: &DatumRef,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc
            .borrow_mut()
            .play_member(player, member_ref.clone(), 1);
        Ok(())
    }

    fn handle_play(player: &mut DirPlayer, datum: &DatumRef) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().play(player);
        Ok(())
    }

    pub fn handle_play_file(
        player: &mut DirPlayer,
        datum: &DatumRef,
        member: &DatumRef,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().play_file(player, member.clone());
        Ok(())
    }

    fn handle_play_next(player: &mut DirPlayer, datum: &DatumRef) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().play_next(player);
        Ok(())
    }

    pub fn handle_stop(player: &mut DirPlayer, datum: &DatumRef) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().stop();
        Ok(())
    }

    fn handle_pause(player: &mut DirPlayer, datum: &DatumRef) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().pause();
        Ok(())
    }

    fn handle_rewind(player: &mut DirPlayer, datum: &DatumRef) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().rewind();
        Ok(())
    }

    /// Parses either a bare member reference or a `[#member: x, #loopCount: n]`
    /// property list into a queueable segment.
    fn parse_segment(player: &DirPlayer, segment_ref: &DatumRef) -> Option<SoundSegment> {
        match player.get_datum(segment_ref) {
            Datum::CastMember(_) => Some(SoundSegment {
                member_ref: segment_ref.clone(),
                loop_count: 1,
                loops_remaining: 1,
            }),
            Datum::PropList(props, _) => {
                let mut member_ref = None;
                let mut loop_count = 1;
                for (key_ref, value_ref) in props {
                    let key = player.get_datum(key_ref);
                    if let Ok(sym) = key.symbol_value() {
                        match sym.to_lowercase().as_str() {
                            "member" => member_ref = Some(value_ref.clone()),
                            "loopcount" => {
                                if let Datum::Int(n) = player.get_datum(value_ref) {
                                    loop_count = *n;
                                }
                            }
                            _ => {}
                        }
                    }
                }
                member_ref.map(|member_ref| SoundSegment {
                    member_ref,
                    loop_count,
                    loops_remaining: loop_count,
                })
            }
            _ => None,
        }
    }

    fn handle_queue(
        player: &mut DirPlayer,
        datum: &DatumRef,
        segment_ref: &DatumRef,
    ) -> Result<(), ScriptError> {
        let segment = Self::parse_segment(player, segment_ref)
            .ok_or_else(|| ScriptError::new("Invalid sound queue entry".to_string()))?;
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc
            .borrow_mut()
            .queue_segment(segment, segment_ref.clone());
        Ok(())
    }

    fn handle_break_loop(player: &mut DirPlayer, datum: &DatumRef) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().break_loop();
        Ok(())
    }

    fn handle_fade_in(
        player: &mut DirPlayer,
        datum: &DatumRef,
        ticks: i32,
        to_volume: f32,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().fade_in(ticks, to_volume);
        Ok(())
    }

    fn handle_fade_out(
        player: &mut DirPlayer,
        datum: &DatumRef,
        ticks: i32,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().fade_out(ticks);
        Ok(())
    }

    fn handle_fade_to(
        player: &mut DirPlayer,
        datum: &DatumRef,
        ticks: i32,
        to_volume: f32,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().fade_to(ticks, to_volume);
        Ok(())
    }

    fn handle_set_playlist(
        player: &mut DirPlayer,
        datum: &DatumRef,
        list_ref: &DatumRef,
    ) -> Result<(), ScriptError> {
        let lingo_list = player.get_datum(list_ref).to_list()?.clone();
        let mut segments = vec![];
        let mut refs = vec![];
        for segment_ref in &lingo_list {
            if let Some(segment) = Self::parse_segment(player, segment_ref) {
                segments.push(segment);
                refs.push(segment_ref.clone());
            }
        }
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().set_playlist(segments, refs);
        Ok(())
    }

    fn handle_get_playlist(
        player: &mut DirPlayer,
        datum: &DatumRef,
    ) -> Result<DatumRef, ScriptError> {
        let channel_rc = Self::get_sound_channel(player, datum)?;
        let playlist = channel_rc.borrow().get_playlist();
        Ok(player.alloc_datum(Datum::List(DatumType::List, playlist, false)))
    }

    fn handle_is_busy(player: &DirPlayer, datum: &DatumRef) -> Result<bool, ScriptError> {
        let channel_rc = Self::get_sound_channel(player, datum)?;
        let is_busy = channel_rc.borrow().is_busy();
        Ok(is_busy)
    }

    fn set_sound_volume(
        player: &mut DirPlayer,
        datum: &DatumRef,
        vol: f32,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel(player, datum)?;
        channel_rc.borrow_mut().set_volume(vol);
        Ok(())
    }

    fn set_sound_pan(player: &mut DirPlayer, datum: &DatumRef, pan: f32) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel(player, datum)?;
        channel_rc.borrow_mut().set_pan(pan);
        Ok(())
    }

    fn set_loop_count(
        player: &mut DirPlayer,
        datum: &DatumRef,
        count: i32,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel(player, datum)?;
        channel_rc.borrow_mut().set_loop_count(count);
        Ok(())
    }

    fn set_start_time(player: &mut DirPlayer, datum: &DatumRef, time: f32) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel(player, datum)?;
        channel_rc.borrow_mut().start_time = time.max(0.0);
        Ok(())
    }

    fn set_end_time(player: &mut DirPlayer, datum: &DatumRef, time: f32) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        let mut channel = channel_rc.borrow_mut();
        channel.end_time = if time == 0.0 {
            channel.get_duration()
        } else {
            time
        };
        Ok(())
    }

    fn set_loop_start_time(
        player: &mut DirPlayer,
        datum: &DatumRef,
        time: f32,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().loop_start_time = time.max(0.0);
        Ok(())
    }

    fn set_loop_end_time(
        player: &mut DirPlayer,
        datum: &DatumRef,
        time: f32,
    ) -> Result<(), ScriptError> {
        let channel_rc = Self::get_sound_channel_mut(player, datum)?;
        channel_rc.borrow_mut().loop_end_time = time;
        Ok(())
    }
}
