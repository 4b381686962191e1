use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};

use crate::{
    director::lingo::datum::Datum,
    player::{reserve_player_mut, DatumRef, DirPlayer, ScriptError},
};

pub struct DateObject {
    pub id: u32,
    pub timestamp_ms: i64, // milliseconds since epoch
}

impl DateObject {
    pub fn new(id: u32) -> Self {
        let now_ms = Utc::now().timestamp_millis();
        DateObject {
            id,
            timestamp_ms: now_ms,
        }
    }

    pub fn from_timestamp(id: u32, timestamp_ms: i64) -> Self {
        DateObject { id, timestamp_ms }
    }

    fn to_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_ms)
            .single()
            .unwrap_or_else(|| Utc.timestamp_millis_opt(0).unwrap())
    }

    fn with_naive(&self, f: impl FnOnce(DateTime<Utc>) -> Option<NaiveDateTime>) -> Option<i64> {
        f(self.to_datetime()).map(|dt| dt.and_utc().timestamp_millis())
    }
}

pub struct DateDatumHandlers;

impl DateDatumHandlers {
    pub fn call(
        datum: &DatumRef,
        handler_name: &String,
        args: &Vec<DatumRef>,
    ) -> Result<DatumRef, ScriptError> {
        reserve_player_mut(|player| {
            let date_id = player.get_datum(datum).to_date_ref()?;
            let date_obj = player
                .date_objects
                .get(&date_id)
                .ok_or_else(|| ScriptError::new(format!("Date object {} not found", date_id)))?;
            let dt = date_obj.to_datetime();

            match handler_name.as_str() {
                "getTime" => Ok(player.alloc_datum(Datum::Int(date_obj.timestamp_ms as i32))),
                "setTime" => {
                    if args.is_empty() {
                        return Err(ScriptError::new(
                            "setTime requires a time argument".to_string(),
                        ));
                    }
                    let time = player.get_datum(&args[0]).int_value()? as i64;
                    let date_obj = player.date_objects.get_mut(&date_id).ok_or_else(|| {
                        ScriptError::new(format!("Date object {} not found", date_id))
                    })?;
                    date_obj.timestamp_ms = time;
                    Ok(DatumRef::Void)
                }
                "getFullYear" => Ok(player.alloc_datum(Datum::Int(dt.year()))),
                "getMonth" => Ok(player.alloc_datum(Datum::Int(dt.month0() as i32))),
                "getDate" => Ok(player.alloc_datum(Datum::Int(dt.day() as i32))),
                "getHours" => Ok(player.alloc_datum(Datum::Int(dt.hour() as i32))),
                "getMinutes" => Ok(player.alloc_datum(Datum::Int(dt.minute() as i32))),
                "getSeconds" => Ok(player.alloc_datum(Datum::Int(dt.second() as i32))),
                "setFullYear" => {
                    if args.is_empty() {
                        return Err(ScriptError::new(
                            "setFullYear requires a year argument".to_string(),
                        ));
                    }
                    let year = player.get_datum(&args[0]).int_value()?;
                    let new_ms = date_obj
                        .with_naive(|dt| {
                            NaiveDate::from_ymd_opt(year, dt.month(), dt.day())
                                .map(|d| d.and_time(dt.time()))
                        })
                        .unwrap_or(date_obj.timestamp_ms);
                    player.date_objects.get_mut(&date_id).unwrap().timestamp_ms = new_ms;
                    Ok(DatumRef::Void)
                }
                "setMonth" => {
                    if args.is_empty() {
                        return Err(ScriptError::new(
                            "setMonth requires a month argument".to_string(),
                        ));
                    }
                    let month = player.get_datum(&args[0]).int_value()?;
                    let new_ms = date_obj
                        .with_naive(|dt| {
                            NaiveDate::from_ymd_opt(dt.year(), (month as u32) + 1, dt.day())
                                .map(|d| d.and_time(dt.time()))
                        })
                        .unwrap_or(date_obj.timestamp_ms);
                    player.date_objects.get_mut(&date_id).unwrap().timestamp_ms = new_ms;
                    Ok(DatumRef::Void)
                }
                "setDate" => {
                    if args.is_empty() {
                        return Err(ScriptError::new(
                            "setDate requires a date argument".to_string(),
                        ));
                    }
                    let day = player.get_datum(&args[0]).int_value()?;
                    let new_ms = date_obj
                        .with_naive(|dt| {
                            NaiveDate::from_ymd_opt(dt.year(), dt.month(), day as u32)
                                .map(|d| d.and_time(dt.time()))
                        })
                        .unwrap_or(date_obj.timestamp_ms);
                    player.date_objects.get_mut(&date_id).unwrap().timestamp_ms = new_ms;
                    Ok(DatumRef::Void)
                }
                "setHours" => {
                    if args.is_empty() {
                        return Err(ScriptError::new(
                            "setHours requires an hours argument".to_string(),
                        ));
                    }
                    let hours = player.get_datum(&args[0]).int_value()?;
                    let new_ms = date_obj
                        .with_naive(|dt| {
                            NaiveTime::from_hms_opt(hours as u32, dt.minute(), dt.second())
                                .map(|t| dt.date_naive().and_time(t))
                        })
                        .unwrap_or(date_obj.timestamp_ms);
                    player.date_objects.get_mut(&date_id).unwrap().timestamp_ms = new_ms;
                    Ok(DatumRef::Void)
                }
                "setMinutes" => {
                    if args.is_empty() {
                        return Err(ScriptError::new(
                            "setMinutes requires a minutes argument".to_string(),
                        ));
                    }
                    let minutes = player.get_datum(&args[0]).int_value()?;
                    let new_ms = date_obj
                        .with_naive(|dt| {
                            NaiveTime::from_hms_opt(dt.hour(), minutes as u32, dt.second())
                                .map(|t| dt.date_naive().and_time(t))
                        })
                        .unwrap_or(date_obj.timestamp_ms);
                    player.date_objects.get_mut(&date_id).unwrap().timestamp_ms = new_ms;
                    Ok(DatumRef::Void)
                }
                "setSeconds" => {
                    if args.is_empty() {
                        return Err(ScriptError::new(
                            "setSeconds requires a seconds argument".to_string(),
                        ));
                    }
                    let seconds = player.get_datum(&args[0]).int_value()?;
                    let new_ms = date_obj
                        .with_naive(|dt| {
                            NaiveTime::from_hms_opt(dt.hour(), dt.minute(), seconds as u32)
                                .map(|t| dt.date_naive().and_time(t))
                        })
                        .unwrap_or(date_obj.timestamp_ms);
                    player.date_objects.get_mut(&date_id).unwrap().timestamp_ms = new_ms;
                    Ok(DatumRef::Void)
                }
                _ => Err(ScriptError::new(format!(
                    "No handler {} for date",
                    handler_name
                ))),
            }
        })
    }

    pub fn get_prop(
        player: &mut DirPlayer,
        _datum: &DatumRef,
        prop: &String,
    ) -> Result<DatumRef, ScriptError> {
        match prop.as_str() {
            "ilk" => Ok(player.alloc_datum(Datum::Symbol("date".to_owned()))),
            _ => Err(ScriptError::new(format!(
                "Cannot get date property {}",
                prop
            ))),
        }
    }

    pub fn set_prop(
        _player: &mut DirPlayer,
        _datum: &DatumRef,
        prop: &String,
        _value: &DatumRef,
    ) -> Result<(), ScriptError> {
        Err(ScriptError::new(format!(
            "Cannot set date property {}",
            prop
        )))
    }
}
