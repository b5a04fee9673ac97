//! Main event loop for the application

use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::prelude::*;
use tokio::runtime::Runtime;

use crate::api::HttpGalleryApi;
use crate::app::Config;
use crate::core::{GalleryState, ModeController};
use crate::handler::{
    action::{handle_action, reload_items, update_prompt_buffer, ActionContext, ActionResult},
    key::{handle_key_event, KeyAction},
};
use crate::scheduler::{AnimationScheduler, ItemSurface};

use super::render::{list_height, render_frame, RenderContext};
use super::surface::TerminalSurface;

/// Poll timeout while idle (balances responsiveness and CPU usage)
const IDLE_POLL: Duration = Duration::from_millis(60);
/// Poll timeout while an animation is running, so phases get drawn
const ANIMATION_POLL: Duration = Duration::from_millis(16);

/// Draw one frame of `state`
fn draw_frame(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &GalleryState,
    surface: &TerminalSurface,
    server_url: &str,
) -> anyhow::Result<()> {
    let render_context = RenderContext {
        state,
        surface,
        server_url,
    };
    terminal.draw(|frame| render_frame(frame, render_context))?;
    Ok(())
}

/// Main event loop
pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: Config) -> anyhow::Result<()> {
    let runtime = Runtime::new()?;
    let api = HttpGalleryApi::new(&config.server_url, config.timeout)?;

    let surface = Arc::new(TerminalSurface::new());
    let scheduler = AnimationScheduler::new(
        surface.clone() as Arc<dyn ItemSurface>,
        config.scheduler.clone(),
        runtime.handle().clone(),
    );

    let mut state = GalleryState::new(Vec::new(), &config.floating_controls);
    state.header_rows = config.header_rows;
    let mut controller = ModeController::new(state).with_scheduler(scheduler.clone());

    let action_context = ActionContext {
        max_upload_bytes: config.max_upload_bytes,
    };

    // Initial load; the surface must know the items before they animate in
    match runtime.block_on(reload_items(&mut controller, &api)) {
        Ok(loaded) => {
            surface.sync(&controller.state().items);
            for id in loaded {
                scheduler.animate_entrance(id);
            }
            tracing::info!(
                items = controller.state().items.len(),
                server = %config.server_url,
                "Gallery loaded"
            );
        }
        Err(e) => tracing::warn!(error = %e, "Initial load failed"),
    }

    loop {
        surface.sync(&controller.state().items);

        let size = terminal.size()?;
        let vis_height = list_height(
            controller.state(),
            Rect::new(0, 0, size.width, size.height),
        );
        {
            let state = controller.state_mut();
            state.clamp_focus();
            state.adjust_viewport(vis_height);
        }

        draw_frame(terminal, controller.state(), &surface, &config.server_url)?;

        let timeout = if scheduler.is_processing() || surface.is_animating() {
            ANIMATION_POLL
        } else {
            IDLE_POLL
        };
        if !event::poll(timeout)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            // Resize and other events only need a redraw
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let action = handle_key_event(controller.state(), key);

        // Editing keys in a prompt map to no action
        if matches!(action, KeyAction::None) && controller.state().prompt.is_some() {
            update_prompt_buffer(&mut controller, key);
            continue;
        }

        // The controller is busy until the action returns; keep drawing the
        // state it started from so exit and update transitions stay visible
        let mut snapshot = controller.state().clone();
        snapshot.pending = None;
        snapshot.prompt = None;
        let result = runtime.block_on(async {
            let action = handle_action(action, &mut controller, &api, &action_context);
            tokio::pin!(action);
            loop {
                tokio::select! {
                    result = &mut action => break result,
                    _ = tokio::time::sleep(ANIMATION_POLL) => {
                        if let Err(e) = draw_frame(terminal, &snapshot, &surface, &config.server_url) {
                            break Err(e);
                        }
                    }
                }
            }
        })?;
        if result == ActionResult::Quit || controller.state().should_quit {
            break;
        }
    }

    scheduler.clear();
    Ok(())
}
