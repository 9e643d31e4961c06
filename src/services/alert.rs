//! Alert playback

use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Anything that can play and halt the zero-crossing alert
pub trait AlertSink: Send {
    /// Start the alert from the beginning
    fn play(&mut self) -> Result<(), String>;
    /// Halt and rewind whatever is playing
    fn stop(&mut self) -> Result<(), String>;
}

/// Plays the alert by running an external player command on a sound file
#[derive(Debug)]
pub struct CommandAlertPlayer {
    program: String,
    sound_file: String,
    child: Option<Child>,
}

impl CommandAlertPlayer {
    pub fn new(program: impl Into<String>, sound_file: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            sound_file: sound_file.into(),
            child: None,
        }
    }

    /// Whether a previously started player process is still alive
    pub fn is_playing(&mut self) -> bool {
        match self.child.as_mut().map(|child| child.try_wait()) {
            Some(Ok(None)) => true,
            Some(Ok(Some(_))) | Some(Err(_)) => {
                self.child = None;
                false
            }
            None => false,
        }
    }
}

impl AlertSink for CommandAlertPlayer {
    fn play(&mut self) -> Result<(), String> {
        // A new crossing restarts the sound rather than overlapping it.
        self.stop()?;

        debug!("Playing alert: {} {}", self.program, self.sound_file);
        let child = Command::new(&self.program)
            .arg(&self.sound_file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to execute {}: {}", self.program, e))?;

        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), String> {
        if !self.is_playing() {
            return Ok(());
        }

        if let Some(mut child) = self.child.take() {
            child.start_kill()
                .map_err(|e| format!("Failed to stop {}: {}", self.program, e))?;
            info!("Alert playback stopped");
        }
        Ok(())
    }
}

/// Sink used with `--no-sound`: only logs
#[derive(Debug, Default)]
pub struct SilentAlertPlayer;

impl AlertSink for SilentAlertPlayer {
    fn play(&mut self) -> Result<(), String> {
        info!("Alert (sound disabled)");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), String> {
        debug!("Alert stop (sound disabled)");
        Ok(())
    }
}

/// Build the sink selected by configuration
pub fn alert_sink_from(no_sound: bool, program: &str, sound_file: &str) -> Box<dyn AlertSink> {
    if no_sound {
        Box::new(SilentAlertPlayer)
    } else {
        if !std::path::Path::new(sound_file).exists() {
            warn!("Alert sound {} not found, playback will likely fail", sound_file);
        }
        Box::new(CommandAlertPlayer::new(program, sound_file))
    }
}

impl AlertSink for Box<dyn AlertSink> {
    fn play(&mut self) -> Result<(), String> {
        (**self).play()
    }

    fn stop(&mut self) -> Result<(), String> {
        (**self).stop()
    }
}
