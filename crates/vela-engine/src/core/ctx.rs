use std::collections::VecDeque;
use std::sync::Arc;

use winit::window::Window;

use crate::gfx::{DebugFlags, Gfx, PlatformData, ResetFlags};
use crate::input::{InputEvent, InputFrame, InputState, Key, MouseState};

/// Window size and renderer flags owned by an application.
///
/// Changed after init only by [`AppCtx::process_events`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub width: u32,
    pub height: u32,
    pub debug: DebugFlags,
    pub reset: ResetFlags,
}

impl RunConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            debug: DebugFlags::TEXT,
            reset: ResetFlags::VSYNC,
        }
    }
}

/// Events queued by the runtime for the next poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Window closed or the platform asked the app to quit.
    Exit,
    /// New backbuffer size in physical pixels.
    Resize { width: u32, height: u32 },
    Input(InputEvent),
}

/// Everything an application reaches through the runtime.
pub struct AppCtx {
    pub gfx: Gfx,
    window: Option<Arc<Window>>,
    events: VecDeque<Event>,
    input: InputState,
    input_frame: InputFrame,
}

impl AppCtx {
    pub fn new(window: Arc<Window>) -> Self {
        Self::with_window(Some(window))
    }

    /// Context without a window; only the noop renderer can be initialized.
    pub fn headless() -> Self {
        Self::with_window(None)
    }

    fn with_window(window: Option<Arc<Window>>) -> Self {
        Self {
            gfx: Gfx::new(),
            window,
            events: VecDeque::new(),
            input: InputState::default(),
            input_frame: InputFrame::default(),
        }
    }

    /// Native handles for `gfx::Init`.
    pub fn platform_data(&self) -> PlatformData {
        PlatformData { window: self.window.clone() }
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Transitions seen by the last [`process_events`](Self::process_events).
    pub fn input_frame(&self) -> &InputFrame {
        &self.input_frame
    }

    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Drains queued events into `config` and `mouse`. Returns `true` when the
    /// application should exit.
    ///
    /// Key bindings: Escape exits, F1 toggles stats, F3 wireframe, F7 vsync,
    /// F8 switches MSAA between off and 4x. Flag and size changes are applied
    /// to the renderer once it is initialized.
    pub fn process_events(&mut self, config: &mut RunConfig, mouse: &mut MouseState) -> bool {
        self.input_frame.clear();
        let mut exit = false;

        while let Some(event) = self.events.pop_front() {
            match event {
                Event::Exit => exit = true,
                Event::Resize { width, height } => {
                    config.width = width.max(1);
                    config.height = height.max(1);
                }
                Event::Input(ev) => self.input.apply_event(&mut self.input_frame, ev),
            }
        }

        for key in &self.input_frame.keys_pressed {
            match key {
                Key::Escape => exit = true,
                Key::F1 => config.debug.toggle(DebugFlags::STATS),
                Key::F3 => config.debug.toggle(DebugFlags::WIREFRAME),
                Key::F7 => config.reset.toggle(ResetFlags::VSYNC),
                Key::F8 => {
                    if config.reset.intersects(ResetFlags::MSAA_MASK) {
                        config.reset.remove(ResetFlags::MSAA_MASK);
                    } else {
                        config.reset.insert(ResetFlags::MSAA_X4);
                    }
                }
                _ => {}
            }
        }

        *mouse = self.input.mouse_state();

        if self.gfx.is_initialized() {
            self.gfx.reset(config.width, config.height, config.reset);
            self.gfx.set_debug(config.debug);
        }
        if self.gfx.is_device_lost() {
            log::error!("renderer device lost; exiting");
            exit = true;
        }
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{Init, RendererType};
    use crate::input::ButtonState;

    fn key(key: Key, state: ButtonState) -> Event {
        Event::Input(InputEvent::Key { key, state, repeat: false })
    }

    fn press(k: Key) -> Event {
        key(k, ButtonState::Pressed)
    }

    fn release(k: Key) -> Event {
        key(k, ButtonState::Released)
    }

    fn poll(ctx: &mut AppCtx, config: &mut RunConfig) -> bool {
        let mut mouse = MouseState::default();
        ctx.process_events(config, &mut mouse)
    }

    // ── exit ──────────────────────────────────────────────────────────────

    #[test]
    fn no_events_no_exit() {
        let mut ctx = AppCtx::headless();
        let mut config = RunConfig::new(1280, 720);
        assert!(!poll(&mut ctx, &mut config));
        assert_eq!(config, RunConfig::new(1280, 720));
    }

    #[test]
    fn exit_event_requests_exit() {
        let mut ctx = AppCtx::headless();
        let mut config = RunConfig::new(1280, 720);
        ctx.push_event(Event::Exit);
        assert!(poll(&mut ctx, &mut config));
        assert!(!poll(&mut ctx, &mut config));
    }

    #[test]
    fn escape_requests_exit() {
        let mut ctx = AppCtx::headless();
        let mut config = RunConfig::new(1280, 720);
        ctx.push_event(press(Key::Escape));
        assert!(poll(&mut ctx, &mut config));
    }

    // ── bindings ──────────────────────────────────────────────────────────

    #[test]
    fn function_keys_toggle_flags() {
        let mut ctx = AppCtx::headless();
        let mut config = RunConfig::new(1280, 720);
        for key in [Key::F1, Key::F3, Key::F7, Key::F8] {
            ctx.push_event(press(key));
        }
        assert!(!poll(&mut ctx, &mut config));
        assert_eq!(config.debug, DebugFlags::TEXT | DebugFlags::STATS | DebugFlags::WIREFRAME);
        assert_eq!(config.reset, ResetFlags::MSAA_X4);

        for key in [Key::F1, Key::F8] {
            ctx.push_event(release(key));
            ctx.push_event(press(key));
        }
        poll(&mut ctx, &mut config);
        assert_eq!(config.debug, DebugFlags::TEXT | DebugFlags::WIREFRAME);
        assert_eq!(config.reset, ResetFlags::empty());
    }

    #[test]
    fn resize_updates_config_and_renderer() {
        let mut ctx = AppCtx::headless();
        ctx.gfx
            .init(Init { renderer_type: RendererType::Noop, ..Init::default() })
            .unwrap();
        let mut config = RunConfig::new(1280, 720);
        ctx.push_event(Event::Resize { width: 640, height: 0 });
        ctx.push_event(press(Key::F1));
        poll(&mut ctx, &mut config);

        assert_eq!((config.width, config.height), (640, 1));
        assert_eq!(ctx.gfx.resolution().width, 640);
        assert!(ctx.gfx.debug().contains(DebugFlags::STATS));
    }

    #[test]
    fn mouse_is_refreshed_every_poll() {
        let mut ctx = AppCtx::headless();
        let mut config = RunConfig::new(1280, 720);
        let mut mouse = MouseState::default();
        ctx.push_event(Event::Input(InputEvent::PointerMoved { x: 12.0, y: 34.0 }));
        ctx.process_events(&mut config, &mut mouse);
        assert_eq!((mouse.x, mouse.y), (12, 34));
        assert_eq!(ctx.input_frame().num_events, 1);

        ctx.process_events(&mut config, &mut mouse);
        assert_eq!((mouse.x, mouse.y), (12, 34));
        assert!(ctx.input_frame().is_empty());
    }
}
