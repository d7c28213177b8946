use std::num::ParseIntError;

use leaf_schema::{ElementId, ElementType, TimeKey};
use thiserror::Error;

use crate::events::{LayoutMode, ViewEvent, SELECT_ALL_SENTINEL};

#[derive(Debug, Error)]
pub enum TriggerParseError {
    #[error("empty trigger")]
    Empty,
    #[error("unknown trigger: {0}")]
    UnknownTrigger(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid time key '{value}': {source}")]
    InvalidTimeKey {
        value: String,
        source: ParseIntError,
    },
    #[error("invalid layout '{0}'")]
    InvalidLayout(String),
}

/// Parse one line of the textual trigger vocabulary.
///
/// ```text
/// tap taxi_1                      node tap
/// edges taxi_1$traffic_1, a$b     edge selection (may be empty)
/// clear                           node selection cleared
/// search taxi, fog                search submit
/// dropdown taxi_1, traffic_2      dropdown value ("dropdown select all" picks everything)
/// select-all | deselect-all
/// filter taxi, traffic            type checkboxes (empty clears the filter)
/// time 200                        slider
/// layout cose
/// filters                         toggle the filter drawer
/// ```
pub fn parse_trigger_line(input: &str) -> Result<ViewEvent, TriggerParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TriggerParseError::Empty);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (trimmed, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "tap" => {
            let node = rest
                .split_whitespace()
                .next()
                .ok_or(TriggerParseError::MissingArgument("node id"))?;
            Ok(ViewEvent::NodeTap {
                node_id: ElementId::from(node),
            })
        }
        "edge" | "edges" => Ok(ViewEvent::EdgeSelection {
            edge_ids: split_list(rest).map(ElementId::from).collect(),
        }),
        "clear" => Ok(ViewEvent::NodeSelectionCleared),
        "search" => Ok(ViewEvent::SearchSubmitted {
            query: rest.to_string(),
        }),
        "dropdown" => {
            let values = if rest.eq_ignore_ascii_case(SELECT_ALL_SENTINEL) {
                vec![SELECT_ALL_SENTINEL.to_string()]
            } else {
                split_list(rest).map(str::to_string).collect()
            };
            Ok(ViewEvent::DropdownChanged { values })
        }
        "select-all" | "select_all" => Ok(ViewEvent::SelectAll),
        "deselect-all" | "deselect_all" => Ok(ViewEvent::DeselectAll),
        "filter" => Ok(ViewEvent::TypeFilterChanged {
            types: split_list(rest).map(ElementType::of).collect(),
        }),
        "time" | "slider" => {
            let value = rest
                .split_whitespace()
                .next()
                .ok_or(TriggerParseError::MissingArgument("time key"))?;
            let time = value
                .parse::<TimeKey>()
                .map_err(|source| TriggerParseError::InvalidTimeKey {
                    value: value.to_string(),
                    source,
                })?;
            Ok(ViewEvent::TimeChanged { time })
        }
        "layout" => {
            if rest.is_empty() {
                return Err(TriggerParseError::MissingArgument("layout"));
            }
            let layout = rest
                .parse::<LayoutMode>()
                .map_err(TriggerParseError::InvalidLayout)?;
            Ok(ViewEvent::LayoutChanged { layout })
        }
        "filters" | "toggle-filters" => Ok(ViewEvent::FilterPanelToggled),
        other => Err(TriggerParseError::UnknownTrigger(other.to_string())),
    }
}

fn split_list(rest: &str) -> impl Iterator<Item = &str> {
    rest.split(',').map(str::trim).filter(|item| !item.is_empty())
}
