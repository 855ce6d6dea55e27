// Operator console calibration commands
//
// Line-oriented ASCII, one command per line:
//   CAL_START:<CHANNEL>
//   CAL_SAVE:<CHANNEL>:<min>:<max>                 (THROTTLE, BRAKE)
//   CAL_SAVE:STEERING:<left>:<center>:<right>
//   CAL_RESET

use crate::calibration::ChannelId;
use crate::mapper::Polarity;

/// Command prefixes
pub mod keywords {
    pub const CAL_START: &str = "CAL_START";
    pub const CAL_SAVE: &str = "CAL_SAVE";
    pub const CAL_RESET: &str = "CAL_RESET";
}

/// Parsed calibration command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Enter calibration on one channel
    StartCalibration(ChannelId),

    /// Persist a range (center only for bipolar channels)
    SaveCalibration {
        channel: ChannelId,
        min: i32,
        max: i32,
        center: Option<i32>,
    },

    /// Restore and persist defaults on every channel
    ResetCalibration,
}

/// Parse one command line
///
/// # Arguments
/// * `line` - received line, with or without trailing `\r` / whitespace
///
/// # Returns
/// * `Some(Command)` if the line is well formed
/// * `None` for unknown keywords, unknown channels, bad numbers or a field
///   count that does not match the channel polarity
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let mut fields = line.split(':');
    let keyword = fields.next()?;

    let command = match keyword {
        keywords::CAL_START => {
            let channel = parse_channel(fields.next())?;
            if fields.next().is_some() {
                error!("CAL_START: too many fields");
                return None;
            }
            Command::StartCalibration(channel)
        }
        keywords::CAL_SAVE => {
            let channel = parse_channel(fields.next())?;
            let first = parse_value(fields.next())?;
            let second = parse_value(fields.next())?;
            let third = match fields.next() {
                Some(field) => Some(parse_value(Some(field))?),
                None => None,
            };
            if fields.next().is_some() {
                error!("CAL_SAVE: too many fields");
                return None;
            }

            match (channel.polarity(), third) {
                (Polarity::Unipolar, None) => Command::SaveCalibration {
                    channel,
                    min: first,
                    max: second,
                    center: None,
                },
                (Polarity::Bipolar, Some(right)) => Command::SaveCalibration {
                    channel,
                    min: first,
                    max: right,
                    center: Some(second),
                },
                _ => {
                    error!("CAL_SAVE: wrong field count for {}", channel.name());
                    return None;
                }
            }
        }
        keywords::CAL_RESET => {
            if fields.next().is_some() {
                error!("CAL_RESET: unexpected fields");
                return None;
            }
            Command::ResetCalibration
        }
        _ => {
            debug!("Unknown command: {}", line);
            return None;
        }
    };

    Some(command)
}

fn parse_channel(field: Option<&str>) -> Option<ChannelId> {
    let Some(field) = field else {
        error!("Command: missing channel");
        return None;
    };
    let channel = ChannelId::from_name(field);
    if channel.is_none() {
        error!("Command: unknown channel {}", field);
    }
    channel
}

fn parse_value(field: Option<&str>) -> Option<i32> {
    let Some(field) = field else {
        error!("Command: missing value");
        return None;
    };
    match field.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            error!("Command: invalid number {}", field);
            None
        }
    }
}
