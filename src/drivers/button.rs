//! Polled button driver with single and double click detection.
//!
//! ## Hardware
//!
//! Momentary switch on a GPIO, read through the `embedded-hal` 1.0
//! [`InputPin`] trait. The active level comes from [`ButtonConfig`]; the
//! default board wiring is active-low with the internal pull-up.
//!
//! A dedicated button task samples the pin every [`POLL_INTERVAL_MS`] and
//! feeds the level into [`GestureDetector`]. Classified gestures go to the
//! callback registered when the [`ButtonAdapter`] was built.
//!
//! ## Gesture detection
//!
//! | Gesture      | Condition                                        |
//! |--------------|--------------------------------------------------|
//! | Single click | Release, then no new press within `short_press_ms` |
//! | Double click | Second press starts within `short_press_ms`      |
//! | (ignored)    | Press shorter than [`DEBOUNCE_MS`]               |
//! | (ignored)    | Hold of `long_press_ms` or more                  |

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::app::ports::ButtonPort;
use crate::config::{ActiveLevel, ButtonConfig};
use crate::drivers::task_pin::{self, Core};

pub const DEBOUNCE_MS: u32 = 20;
pub const POLL_INTERVAL_MS: u64 = 10;

const BUTTON_TASK_PRIORITY: u8 = 5;
const BUTTON_TASK_STACK_KB: usize = 4;

/// Gestures delivered to the registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonGesture {
    SingleClick,
    DoubleClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonError {
    /// GPIO could not be configured or the button task could not start.
    PeripheralInitFailed,
    /// `initialize` called while a handle is already live.
    AlreadyInitialized,
}

impl fmt::Display for ButtonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeripheralInitFailed => write!(f, "peripheral init failed"),
            Self::AlreadyInitialized => write!(f, "already initialized"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Gesture state machine
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Pressed { since_ms: u32, clicks: u8 },
    Released { at_ms: u32 },
    LongHold,
}

/// Pure click classifier. Feed it the sampled level and a monotonic
/// millisecond clock.
#[derive(Debug)]
pub struct GestureDetector {
    short_press_ms: u32,
    long_press_ms: u32,
    state: GestureState,
}

impl GestureDetector {
    pub fn new(config: &ButtonConfig) -> Self {
        Self {
            short_press_ms: config.short_press_ms as u32,
            long_press_ms: config.long_press_ms as u32,
            state: GestureState::Idle,
        }
    }

    /// Advance with the current level. Returns a classified gesture, if any.
    pub fn tick(&mut self, now_ms: u32, pressed: bool) -> Option<ButtonGesture> {
        match self.state {
            GestureState::Idle => {
                if pressed {
                    self.state = GestureState::Pressed { since_ms: now_ms, clicks: 0 };
                }
                None
            }

            GestureState::Pressed { since_ms, clicks } => {
                let held_ms = now_ms.wrapping_sub(since_ms);

                if pressed {
                    if held_ms >= self.long_press_ms {
                        self.state = GestureState::LongHold;
                    }
                    return None;
                }

                if held_ms >= self.long_press_ms {
                    self.state = GestureState::Idle;
                    return None;
                }

                if held_ms < DEBOUNCE_MS {
                    // Bounce: forget this press but keep a pending first click.
                    self.state = if clicks == 0 {
                        GestureState::Idle
                    } else {
                        GestureState::Released { at_ms: now_ms }
                    };
                    return None;
                }

                if clicks >= 1 {
                    self.state = GestureState::Idle;
                    return Some(ButtonGesture::DoubleClick);
                }

                self.state = GestureState::Released { at_ms: now_ms };
                None
            }

            GestureState::Released { at_ms } => {
                if pressed {
                    self.state = GestureState::Pressed { since_ms: now_ms, clicks: 1 };
                    return None;
                }
                if now_ms.wrapping_sub(at_ms) > self.short_press_ms {
                    self.state = GestureState::Idle;
                    return Some(ButtonGesture::SingleClick);
                }
                None
            }

            GestureState::LongHold => {
                if !pressed {
                    self.state = GestureState::Idle;
                }
                None
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Button task + handle
// ───────────────────────────────────────────────────────────────

/// Live button task. Dropping without [`delete`](Self::delete) detaches it.
pub struct ButtonHandle {
    stop: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl ButtonHandle {
    /// Start sampling `pin` on a dedicated task.
    pub fn spawn<P>(
        mut pin: P,
        config: ButtonConfig,
        on_gesture: Arc<dyn Fn(ButtonGesture) + Send + Sync>,
    ) -> Result<Self, ButtonError>
    where
        P: InputPin + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let task_stop = stop.clone();

        let task = task_pin::spawn_on_core(
            Core::App,
            BUTTON_TASK_PRIORITY,
            BUTTON_TASK_STACK_KB,
            "button\0",
            move || {
                let mut detector = GestureDetector::new(&config);
                let start = Instant::now();
                while !task_stop.load(Ordering::Acquire) {
                    let pressed = match config.active_level {
                        ActiveLevel::Low => pin.is_low(),
                        ActiveLevel::High => pin.is_high(),
                    }
                    .unwrap_or(false);
                    let now_ms = start.elapsed().as_millis() as u32;
                    if let Some(gesture) = detector.tick(now_ms, pressed) {
                        on_gesture(gesture);
                    }
                    std::thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
                }
            },
        )
        .map_err(|e| {
            warn!("Button: task spawn failed ({})", e);
            ButtonError::PeripheralInitFailed
        })?;

        Ok(Self { stop, task })
    }

    /// Stop the task and wait for it to exit.
    pub fn delete(self) {
        self.stop.store(true, Ordering::Release);
        if self.task.join().is_err() {
            warn!("Button: task panicked");
        }
    }
}

/// Opens the button pin for a given configuration.
pub type PinOpener<P> = Box<dyn FnMut(&ButtonConfig) -> Result<P, ButtonError> + Send>;

/// [`ButtonPort`] implementation: opens the pin, runs the button task, and
/// forwards single/double clicks to one callback.
pub struct ButtonAdapter<P> {
    open_pin: PinOpener<P>,
    on_gesture: Arc<dyn Fn(ButtonGesture) + Send + Sync>,
    handle: Option<ButtonHandle>,
}

impl<P> ButtonAdapter<P>
where
    P: InputPin + Send + 'static,
{
    pub fn new(
        open_pin: PinOpener<P>,
        on_gesture: impl Fn(ButtonGesture) + Send + Sync + 'static,
    ) -> Self {
        Self {
            open_pin,
            on_gesture: Arc::new(on_gesture),
            handle: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }
}

impl<P> ButtonPort for ButtonAdapter<P>
where
    P: InputPin + Send + 'static,
{
    fn initialize(&mut self, config: &ButtonConfig) -> Result<(), ButtonError> {
        if self.handle.is_some() {
            return Err(ButtonError::AlreadyInitialized);
        }
        let pin = (self.open_pin)(config)?;
        let handle = ButtonHandle::spawn(pin, *config, self.on_gesture.clone())?;
        self.handle = Some(handle);
        info!(
            "Button: GPIO{} ready (active {:?}, click gap {}ms, long {}ms)",
            config.gpio, config.active_level, config.short_press_ms, config.long_press_ms
        );
        Ok(())
    }

    fn teardown(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.delete();
                info!("Button: released");
                true
            }
            None => false,
        }
    }
}
