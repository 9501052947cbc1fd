//! The output controller: one place that turns lights and tone on and off.
//!
//! Every trigger funnels into [`OutputController::set_active`]. The whole
//! transition (state flag, output lines, audio start or stop) runs inside one
//! critical section, so a button edge and a wireless write arriving together
//! cannot interleave and the last call to enter wins.
//!
//! ```text
//!           set_active(true)                 set_active(false)
//! inactive ─────────────────▶ active ─────────────────────────▶ inactive
//!           lines high                       lines low
//!           prime pattern, start audio       stop audio
//! ```
//!
//! Nothing here waits on the block pool. Priming uses the pattern itself,
//! which makes `set_active` safe to call from interrupt handlers.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::OutputPin;

use crate::constants::OUTPUT_LINES;
use crate::error::Error;
use crate::io::{AudioDriver, AudioPath, AudioTransmit};
use crate::outputs::OutputBank;
use crate::pattern::AudioPattern;
use crate::state::ActiveState;

/// What a call to [`set_active`](OutputController::set_active) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Already in the requested state. Nothing was touched.
    Unchanged,
    Activated,
    Deactivated,
}

/// Anything that accepts on/off requests. Triggers are written against this.
pub trait SetActive {
    fn set_active(&self, active: bool) -> Transition;
}

/// Result of the audio half of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioAction {
    /// No working audio path; lights only.
    Skipped,
    Done,
    Failed(Error),
}

pub struct OutputController<'r, 'a, P, T, const N: usize = OUTPUT_LINES> {
    state: &'r ActiveState,
    audio: &'r AudioPath<'a, T>,
    pattern: &'a AudioPattern,
    outputs: Mutex<RefCell<OutputBank<P, N>>>,
}

impl<'r, 'a, P, T, const N: usize> OutputController<'r, 'a, P, T, N>
where
    P: OutputPin,
    T: AudioTransmit<'a>,
{
    pub fn new(
        state: &'r ActiveState,
        audio: &'r AudioPath<'a, T>,
        pattern: &'a AudioPattern,
        outputs: OutputBank<P, N>,
    ) -> Self {
        OutputController {
            state,
            audio,
            pattern,
            outputs: Mutex::new(RefCell::new(outputs)),
        }
    }

    /// Move to `active`. Repeating the current state does nothing.
    pub fn set_active(&self, active: bool) -> Transition {
        let (transition, failed_lines, audio) = critical_section::with(|cs| {
            if self.state.is_active() == active {
                return (Transition::Unchanged, 0, AudioAction::Done);
            }
            self.state.replace(active);

            let failed_lines = self.outputs.borrow_ref_mut(cs).set_all(active);
            let audio = self.audio.lock_in(cs, |driver| {
                if active {
                    Self::start_audio(driver, self.pattern)
                } else {
                    Self::stop_audio(driver)
                }
            });

            let transition = if active {
                Transition::Activated
            } else {
                Transition::Deactivated
            };
            (transition, failed_lines, audio)
        });

        // Log outside the critical section.
        if transition == Transition::Unchanged {
            log::trace!("controller: already {}", if active { "on" } else { "off" });
            return transition;
        }
        if failed_lines > 0 {
            log::warn!("controller: {} of {} lines failed", failed_lines, N);
        }
        match audio {
            AudioAction::Done => {}
            AudioAction::Skipped => log::debug!("controller: audio unavailable, lights only"),
            AudioAction::Failed(err) => log::warn!("controller: audio: {}", err),
        }
        log::info!("controller: {}", if active { "on" } else { "off" });
        transition
    }

    fn start_audio(driver: &mut AudioDriver<'a, T>, pattern: &'a AudioPattern) -> AudioAction {
        if !driver.is_configured() {
            return AudioAction::Skipped;
        }
        let mut result = Ok(());
        // A running stream is already fed; priming again would only add latency.
        if !driver.is_running() {
            result = driver.prime(pattern.into());
        }
        // Start even if priming failed; the peripheral decides.
        let started = driver.start();
        match result.and(started) {
            Ok(()) => AudioAction::Done,
            Err(err) => AudioAction::Failed(err),
        }
    }

    fn stop_audio(driver: &mut AudioDriver<'a, T>) -> AudioAction {
        if !driver.is_configured() {
            return AudioAction::Skipped;
        }
        match driver.stop() {
            Ok(()) => AudioAction::Done,
            Err(err) => AudioAction::Failed(err),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Level the output lines were last driven to.
    pub fn lines(&self) -> bool {
        critical_section::with(|cs| self.outputs.borrow_ref(cs).level())
    }
}

impl<'a, P, T, const N: usize> SetActive for OutputController<'_, 'a, P, T, N>
where
    P: OutputPin,
    T: AudioTransmit<'a>,
{
    fn set_active(&self, active: bool) -> Transition {
        OutputController::set_active(self, active)
    }
}
