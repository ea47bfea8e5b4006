use crate::core::{Error, Result, Track};
use regex::{Captures, Regex};
use std::time::Duration;

/// Formats a duration as `m:ss`, or `h:mm:ss` past the hour.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs / 60) % 60, secs % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Expands a player command template into an argv.
///
/// The template is split on whitespace before substitution, so a title with
/// spaces stays a single argument. `input` is what the player should open.
pub fn render_command(template: &str, track: &Track, input: &str) -> Result<Vec<String>> {
    let placeholder = Regex::new(r"\{(\w+)\}").map_err(|e| Error::PlayerCommand(e.to_string()))?;

    let lookup = |name: &str| -> Option<String> {
        match name {
            "input" => Some(input.to_string()),
            "url" => Some(track.url.clone()),
            "title" => Some(track.title.clone()),
            "artist" => Some(track.artist.clone()),
            "referer" => Some(track.referer.clone()),
            "duration" => Some(track.duration.to_string()),
            "localname" => Some(track.localname.clone()),
            _ => None,
        }
    };

    if let Some(unknown) = placeholder
        .captures_iter(template)
        .find(|caps| lookup(&caps[1]).is_none())
    {
        return Err(Error::PlayerCommand(format!(
            "unknown placeholder `{}`",
            &unknown[0]
        )));
    }

    let argv: Vec<String> = template
        .split_whitespace()
        .map(|arg| {
            placeholder
                .replace_all(arg, |caps: &Captures| lookup(&caps[1]).unwrap_or_default())
                .into_owned()
        })
        .collect();

    if argv.is_empty() {
        return Err(Error::PlayerCommand("empty command".to_string()));
    }

    Ok(argv)
}
