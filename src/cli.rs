use anyhow::{bail, Context, Result};
use clap::Parser;
use std::time::Duration;

use voxclip::config::DEFAULT_CONFIG_PATH;
use voxclip::inbox::RowSnapshot;
use voxclip::ScreenState;

#[derive(Parser, Debug)]
#[command(name = "voxclip", version, about = "Record, preview and send short voice clips")]
pub struct Args {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Run comma-separated commands instead of reading stdin, e.g. "r,wait 3,r,p,wait 3"
    #[arg(short, long)]
    pub script: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start or stop recording
    Record,
    /// Play/pause the preview
    Play,
    Discard,
    /// Pick or unpick a recipient
    Toggle(String),
    Send,
    /// Show the inbox
    List,
    /// Play/pause inbox row n (1-based)
    PlayRow(usize),
    /// Let the clocks run for a while (scripts)
    Wait(Duration),
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            bail!("empty command");
        };
        let arg = parts.next();

        let command = match word {
            "r" | "record" => Command::Record,
            "p" | "play" => Command::Play,
            "d" | "discard" => Command::Discard,
            "t" | "to" => {
                let id = arg.context("usage: t <friend-id>")?;
                Command::Toggle(id.to_string())
            }
            "s" | "send" => Command::Send,
            "l" | "list" => Command::List,
            "i" | "inbox" => {
                let n: usize = arg
                    .context("usage: i <row>")?
                    .parse()
                    .context("row must be a number")?;
                if n == 0 {
                    bail!("rows are numbered from 1");
                }
                Command::PlayRow(n)
            }
            "w" | "wait" => {
                let secs: f64 = arg
                    .context("usage: wait <seconds>")?
                    .parse()
                    .context("seconds must be a number")?;
                if !secs.is_finite() || secs < 0.0 {
                    bail!("seconds must be positive");
                }
                Command::Wait(Duration::from_secs_f64(secs))
            }
            "status" => Command::Status,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => bail!("unknown command: {}", other),
        };

        Ok(command)
    }

    /// Split a `--script` argument into commands
    pub fn parse_script(script: &str) -> Result<Vec<Self>> {
        script
            .split(',')
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(Command::parse)
            .collect()
    }
}

pub const HELP: &str = "\
commands:
  r            start/stop recording
  p            play/pause the preview
  d            discard the preview
  t <id>       pick/unpick a recipient
  s            send the preview to the picked recipients
  l            list the inbox
  i <n>        play/pause inbox row n
  wait <secs>  let time pass
  q            quit";

const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Draw magnitudes as block glyphs
pub fn render_bars(bars: &[f32]) -> String {
    bars.iter()
        .map(|b| {
            let index = (b.clamp(0.0, 1.0) * (BAR_GLYPHS.len() - 1) as f32).round() as usize;
            BAR_GLYPHS[index]
        })
        .collect()
}

/// Draw a seek bar `width` cells wide
pub fn render_progress(fraction: f32, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f32).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn render_screen(state: &ScreenState) -> String {
    let mut line = format!("[{}] {} {}", state.mode, state.timer, render_bars(&state.bars));

    if let Some(playback) = &state.playback {
        line.push_str(&format!(
            " {} {}",
            render_progress(playback.progress, 20),
            playback.status
        ));
    } else if state.mode == voxclip::ScreenMode::Preview {
        line.push_str(" (too short to play)");
    }

    if state.selected_recipients > 0 {
        line.push_str(&format!(" | {} selected", state.selected_recipients));
    }

    if let Some(error) = &state.last_error {
        line.push_str(&format!(" | {}", error));
    }

    line
}

pub fn render_row(index: usize, row: &RowSnapshot) -> String {
    format!(
        "{:>2}. {} ({}) {} {} {}/{} {}",
        index + 1,
        row.sender,
        row.sent_label,
        render_bars(&row.bars),
        render_progress(row.playback.progress, 12),
        row.timer,
        row.duration_label,
        row.playback.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("r").unwrap(), Command::Record);
        assert_eq!(Command::parse("t 4").unwrap(), Command::Toggle("4".to_string()));
        assert_eq!(Command::parse("i 2").unwrap(), Command::PlayRow(2));
        assert_eq!(
            Command::parse("wait 1.5").unwrap(),
            Command::Wait(Duration::from_millis(1500))
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("t").is_err());
        assert!(Command::parse("i 0").is_err());
        assert!(Command::parse("wait -1").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn test_parse_script() {
        let commands = Command::parse_script("r, wait 3 ,r,,p").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::Record,
                Command::Wait(Duration::from_secs(3)),
                Command::Record,
                Command::Play,
            ]
        );
    }

    #[test]
    fn test_render_bars_and_progress() {
        assert_eq!(render_bars(&[0.0, 1.0]), "▁█");
        assert_eq!(render_progress(0.5, 4), "[##--]");
        assert_eq!(render_progress(2.0, 4), "[####]");
    }
}
