//! Light adapter.
//!
//! Messages have the form `power#brightness#color`:
//! - power: `on` / `off`
//! - brightness: percent, 0-100
//! - color: color temperature in Kelvin, or a packed RGB integer `R*65536 + G*256 + B`
//!
//! The color field carries no tag. On decode it is read as a color temperature when the
//! device currently supports the `color_temp` color mode, and as packed RGB otherwise.

use linkme::distributed_slice;

use super::MsgGenerator;
use super::MsgResolver;
use super::SyncAdapter;
use super::REGISTRY;
use crate::entity::Attributes;
use crate::entity::STATE_ON;
use crate::error::Result;
use crate::error::SyncError;
use crate::message::MsgField;
use crate::message::MSG_OFF;
use crate::message::MSG_ON;
use crate::service::Service;
use crate::service::ServiceCall;
use crate::topic::TopicSuffix;

pub const DOMAIN: &str = "light";

pub const ATTR_BRIGHTNESS: &str = "brightness";
pub const ATTR_BRIGHTNESS_PCT: &str = "brightness_pct";
pub const ATTR_COLOR_TEMP_KELVIN: &str = "color_temp_kelvin";
pub const ATTR_MIN_COLOR_TEMP_KELVIN: &str = "min_color_temp_kelvin";
pub const ATTR_MAX_COLOR_TEMP_KELVIN: &str = "max_color_temp_kelvin";
pub const ATTR_COLOR_TEMP: &str = "color_temp";
pub const ATTR_MIN_MIREDS: &str = "min_mireds";
pub const ATTR_MAX_MIREDS: &str = "max_mireds";
pub const ATTR_RGB_COLOR: &str = "rgb_color";
pub const ATTR_SUPPORTED_COLOR_MODES: &str = "supported_color_modes";

pub const COLOR_MODE_COLOR_TEMP: &str = "color_temp";

/// Kelvin = MIRED_SCALE / mired
const MIRED_SCALE: i64 = 1_000_000;

/// Host brightness (0-255) per message percent point
const BRIGHTNESS_SCALE: f64 = 2.55;

static GENERATORS: [MsgGenerator; 3] = [power_field, brightness_field, color_field];

static RESOLVERS: [MsgResolver; 1] = [MsgResolver {
    min: 0,
    max: 3,
    resolve: resolve_light,
}];

/// Syncs a host light entity to a bemfa light device
#[derive(Debug, Clone, Copy, Default)]
pub struct Light;

impl SyncAdapter for Light {
    fn domain(&self) -> &'static str {
        DOMAIN
    }

    fn topic_suffix(&self) -> TopicSuffix {
        TopicSuffix::Light
    }

    fn msg_generators(&self) -> &'static [MsgGenerator] {
        &GENERATORS
    }

    fn msg_resolvers(&self) -> &'static [MsgResolver] {
        &RESOLVERS
    }
}

#[distributed_slice(REGISTRY)]
fn register_light() -> Box<dyn SyncAdapter> {
    Box::new(Light)
}

fn power_field(state: &str, _attributes: &Attributes) -> Result<Option<MsgField>> {
    let token = if state == STATE_ON { MSG_ON } else { MSG_OFF };
    Ok(Some(token.into()))
}

fn brightness_field(_state: &str, attributes: &Attributes) -> Result<Option<MsgField>> {
    Ok(attributes
        .number(ATTR_BRIGHTNESS)?
        .map(|b| MsgField::Int((b / BRIGHTNESS_SCALE).round() as i64)))
}

fn color_field(_state: &str, attributes: &Attributes) -> Result<Option<MsgField>> {
    if let Some(kelvin) = attributes.integer(ATTR_COLOR_TEMP_KELVIN)? {
        return Ok(Some(kelvin.into()));
    }

    if let Some(mired) = attributes.integer(ATTR_COLOR_TEMP)? {
        let kelvin = floor_div(MIRED_SCALE, mired, ATTR_COLOR_TEMP)?;
        return Ok(Some(kelvin.into()));
    }

    Ok(attributes
        .rgb(ATTR_RGB_COLOR)?
        .map(|rgb| MsgField::Int(pack_rgb(rgb))))
}

fn resolve_light(msg: &[MsgField], attributes: &Attributes) -> Result<ServiceCall> {
    let power = msg.first().ok_or(SyncError::EmptyMessage)?;
    let service = if power.is_token(MSG_ON) {
        Service::TurnOn
    } else {
        Service::TurnOff
    };

    let mut call = ServiceCall::new(DOMAIN, service);

    if let Some(brightness) = msg.get(1) {
        call = call.with(ATTR_BRIGHTNESS_PCT, brightness.as_int(1)?);
    }

    if let Some(color) = msg.get(2) {
        let color = color.as_int(2)?;
        call = if supports_color_temp(attributes)? {
            resolve_color_temp(call, color, attributes)?
        } else {
            call.with(ATTR_RGB_COLOR, unpack_rgb(color)?.to_vec())
        };
    }

    Ok(call)
}

fn supports_color_temp(attributes: &Attributes) -> Result<bool> {
    Ok(attributes
        .string_list(ATTR_SUPPORTED_COLOR_MODES)?
        .is_some_and(|modes| modes.contains(&COLOR_MODE_COLOR_TEMP)))
}

/// Devices reporting Kelvin bounds take Kelvin; the rest take mireds.
fn resolve_color_temp(
    call: ServiceCall,
    kelvin: i64,
    attributes: &Attributes,
) -> Result<ServiceCall> {
    let min_kelvin = attributes.integer(ATTR_MIN_COLOR_TEMP_KELVIN)?;
    let max_kelvin = attributes.integer(ATTR_MAX_COLOR_TEMP_KELVIN)?;

    if let (Some(min), Some(max)) = (min_kelvin, max_kelvin) {
        return Ok(call.with(ATTR_COLOR_TEMP_KELVIN, clamp(kelvin, min, max)));
    }

    let mired = floor_div(MIRED_SCALE, kelvin, ATTR_COLOR_TEMP)?;
    let min = attributes.require_integer(ATTR_MIN_MIREDS)?;
    let max = attributes.require_integer(ATTR_MAX_MIREDS)?;
    Ok(call.with(ATTR_COLOR_TEMP, clamp(mired, min, max)))
}

/// `min(max(value, lo), hi)`; unlike `Ord::clamp` this tolerates `lo > hi`.
fn clamp(value: i64, lo: i64, hi: i64) -> i64 {
    value.max(lo).min(hi)
}

/// Division rounding towards negative infinity.
fn floor_div(numerator: i64, denominator: i64, key: &'static str) -> Result<i64> {
    if denominator == 0 {
        return Err(SyncError::DivisionByZero { key });
    }
    let quotient = numerator / denominator;
    if numerator % denominator != 0 && (numerator < 0) != (denominator < 0) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

fn pack_rgb([r, g, b]: [u8; 3]) -> i64 {
    i64::from(r) * 65536 + i64::from(g) * 256 + i64::from(b)
}

fn unpack_rgb(packed: i64) -> Result<[u8; 3]> {
    if !(0..=0xFF_FFFF).contains(&packed) {
        return Err(SyncError::ColorOutOfRange(packed));
    }
    Ok([
        (packed / 65536) as u8,
        (packed / 256 % 256) as u8,
        (packed % 256) as u8,
    ])
}
