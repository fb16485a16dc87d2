//! The engine loop: input flow and render cadence.
//!
//! Two threads: the blocking stdin reader ships raw bytes over a channel,
//! and the driving loop owns the tree, framebuffer and terminal. Input
//! dispatch and rendering never interleave because both happen here.
//! Redraw requests coalesce into the tree's single dirty flag and are
//! served at most `Config::fps` times per second; a resize rebuilds the
//! framebuffer and forces a full repaint.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::EngineError;
use crate::framebuffer::FrameBuffer;
use crate::input::{InputDecoder, InputEvent, Key, StdinMessage, StdinReader};
use crate::surface::Surface;
use crate::term::driver::{self, TermDriver};
use crate::term::TermScreen;
use crate::view::ViewTree;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound on redraws per second.
    pub fps: u32,
    /// Translate ctrl+c into an exit request.
    pub ctrl_c_exits: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 20,
            ctrl_c_exits: true,
        }
    }
}

/// Cloneable handle that asks the loop to unwind.
#[derive(Clone)]
pub struct ExitHandle(Arc<AtomicBool>);

impl ExitHandle {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn exit(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run the engine until exit is requested.
///
/// `tick` runs once per loop iteration, after input dispatch; application
/// logic reacts to widget state there and may request exit or mutate the
/// tree.
pub fn run(
    tree: &mut ViewTree,
    config: Config,
    mut tick: impl FnMut(&mut ViewTree, &ExitHandle),
) -> Result<(), EngineError> {
    let mut term = TermDriver::enter()?;
    let result = drive(tree, &config, &mut tick);
    term.restore()?;
    result
}

fn drive(
    tree: &mut ViewTree,
    config: &Config,
    tick: &mut impl FnMut(&mut ViewTree, &ExitHandle),
) -> Result<(), EngineError> {
    let exit = ExitHandle::new();
    let (width, height) = driver::terminal_size();
    let mut fb = FrameBuffer::new(width, height);
    let mut screen = TermScreen::new(io::stdout(), width, height);
    let (mut reader, rx) = StdinReader::spawn()?;
    let mut decoder = InputDecoder::new();

    let frame = Duration::from_millis(1000 / config.fps.max(1) as u64);
    let mut last_render = Instant::now() - frame;
    let mut input_open = true;

    if tree.focused_leaf().is_none() && tree.focusable(tree.root()) {
        tree.focus(tree.root());
    }

    while !exit.requested() {
        pump_input(&rx, &mut decoder, tree, config, &exit, &mut input_open, frame);
        tick(tree, &exit);

        if driver::take_resize() {
            let (width, height) = driver::terminal_size();
            debug!(width, height, "terminal resized");
            fb = FrameBuffer::new(width, height);
            screen.resize(width, height);
            tree.mark_dirty();
        }

        if last_render.elapsed() >= frame && tree.take_dirty() {
            tree.layout(fb.width(), fb.height());
            tree.render(&mut fb);
            fb.flush(&mut screen);
            screen.flush_frame()?;
            last_render = Instant::now();
        }
    }

    debug!("engine loop exiting");
    reader.stop();
    Ok(())
}

fn pump_input(
    rx: &Receiver<StdinMessage>,
    decoder: &mut InputDecoder,
    tree: &mut ViewTree,
    config: &Config,
    exit: &ExitHandle,
    input_open: &mut bool,
    frame: Duration,
) {
    if !*input_open {
        // Keep ticking and rendering after stdin is gone.
        thread::sleep(frame);
        return;
    }
    match rx.recv_timeout(frame) {
        Ok(StdinMessage::Data(bytes)) => {
            for event in decoder.feed(&bytes) {
                match event {
                    InputEvent::Key(key) => {
                        if config.ctrl_c_exits && key.ctrl && key.key == Key::Char('c') {
                            exit.exit();
                        } else {
                            tree.dispatch_key(&key);
                        }
                    }
                    InputEvent::Mouse(mouse) => tree.dispatch_mouse(&mouse),
                }
            }
        }
        Ok(StdinMessage::Closed) | Err(RecvTimeoutError::Disconnected) => {
            debug!("input stream closed");
            *input_open = false;
        }
        Err(RecvTimeoutError::Timeout) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.fps, 20);
        assert!(config.ctrl_c_exits);
    }

    #[test]
    fn exit_handle_is_sticky_across_clones() {
        let exit = ExitHandle::new();
        let clone = exit.clone();
        assert!(!exit.requested());
        clone.exit();
        assert!(exit.requested());
    }
}
