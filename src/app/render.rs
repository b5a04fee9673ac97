//! Frame rendering for the gallery

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use crate::core::{GalleryState, Item, Mode, PendingAction};
use crate::scheduler::TransitionPhase;

use super::surface::TerminalSurface;

const STATUS_HEIGHT: u16 = 3;
const ACTION_BAR_HEIGHT: u16 = 3;
/// Bordered bars need at least this many rows
const MIN_BAR_HEIGHT: u16 = 3;

/// Context for rendering a frame
pub struct RenderContext<'a> {
    pub state: &'a GalleryState,
    pub surface: &'a TerminalSurface,
    pub server_url: &'a str,
}

/// Areas of one frame
struct FrameLayout {
    header: Rect,
    list: Rect,
    action_bar: Option<Rect>,
    status: Rect,
}

fn split_frame(state: &GalleryState, area: Rect) -> FrameLayout {
    let header_height = if state.mode.is_editing() {
        state.chrome.layout_offset.max(MIN_BAR_HEIGHT)
    } else {
        MIN_BAR_HEIGHT
    };
    let action_height = if state.chrome.action_bar.is_visible() {
        ACTION_BAR_HEIGHT
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(0),
            Constraint::Length(action_height),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    FrameLayout {
        header: chunks[0],
        list: chunks[1],
        action_bar: (action_height > 0).then_some(chunks[2]),
        status: chunks[3],
    }
}

/// Rows available to the item list inside its border
pub fn list_height(state: &GalleryState, area: Rect) -> usize {
    split_frame(state, area).list.height.saturating_sub(2) as usize
}

/// Render a complete frame
pub fn render_frame(frame: &mut Frame, ctx: RenderContext) {
    let size = frame.area();

    if let Some(item) = ctx
        .state
        .viewing
        .as_ref()
        .and_then(|id| ctx.state.item(id))
    {
        render_viewer(frame, ctx.state, item, size);
        return;
    }

    let layout = split_frame(ctx.state, size);
    render_header(frame, &ctx, layout.header);
    render_items(frame, &ctx, layout.list);
    if let Some(area) = layout.action_bar {
        render_action_bar(frame, ctx.state, area);
    }
    render_status_bar(frame, ctx.state, layout.status);

    if let Some(pending) = &ctx.state.pending {
        draw_confirm_popup(frame, pending);
    } else if let Some(prompt) = &ctx.state.prompt {
        draw_input_popup(frame, prompt.kind.label(), &prompt.buffer.text);
    }
}

fn render_header(frame: &mut Frame, ctx: &RenderContext, area: Rect) {
    let chrome = &ctx.state.chrome;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let line = if chrome.select_header.is_visible() {
        Line::from(vec![
            Span::styled("Select ", bold.fg(Color::Cyan)),
            Span::raw(format!(
                "{} of {} selected  ",
                chrome.counters.selected, chrome.counters.total
            )),
            Span::styled(
                format!("[Ctrl+A] {}", chrome.select_all_label),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("  [Esc] Done", Style::default().fg(Color::DarkGray)),
        ])
    } else if chrome.browse_header.is_visible() {
        Line::from(vec![
            Span::styled("Edit ", bold.fg(Color::Green)),
            Span::raw(format!("{} artworks  ", chrome.counters.total)),
            Span::styled(
                "[s] Select  [a] Add  [n] Title  [c] Caption  [d] Delete  [Esc] Exit",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        let mut spans = vec![Span::styled("Gallery ", bold)];
        if chrome.entry_control.is_visible() {
            spans.push(Span::styled("[e] Edit ", Style::default().fg(Color::Green)));
        }
        for (element, control) in &chrome.floating {
            if control.is_visible() {
                spans.push(Span::styled(
                    format!("[{}] ", element.display_name()),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
        Line::from(spans)
    };

    let title = format!(" {} ", ctx.server_url);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(header, area);
}

fn render_items(frame: &mut Frame, ctx: &RenderContext, area: Rect) {
    let state = ctx.state;
    let visible_height = area.height.saturating_sub(2) as usize;

    let items: Vec<ListItem> = state
        .items
        .iter()
        .enumerate()
        .skip(state.viewport_top)
        .take(visible_height)
        .map(|(index, item)| {
            render_item(item, index == state.focus_index, ctx.surface.phase(&item.id))
        })
        .collect();

    let title = format!(" {} ", state.mode.display_name());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

/// Render a single gallery row as a ListItem
fn render_item(item: &Item, is_focused: bool, phase: TransitionPhase) -> ListItem<'static> {
    let checkbox = match (item.flags.has_affordance, item.flags.selected) {
        (true, true) => "[x] ",
        (true, false) => "[ ] ",
        (false, _) => "",
    };

    let mut style = match phase {
        TransitionPhase::Entering => Style::default().fg(Color::DarkGray),
        TransitionPhase::Arrival => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        TransitionPhase::Pulse => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        TransitionPhase::Removing => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::CROSSED_OUT),
        TransitionPhase::Idle | TransitionPhase::Visible | TransitionPhase::Done => {
            Style::default()
        }
    };

    if item.flags.selected {
        style = style.fg(Color::Cyan);
    }
    if is_focused {
        style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
    }

    let line = Line::from(vec![
        Span::styled(checkbox, Style::default().fg(Color::Yellow)),
        Span::styled(item.display_title(), style),
        Span::styled(
            format!("  #{}", item.id),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    ListItem::new(line)
}

fn render_action_bar(frame: &mut Frame, state: &GalleryState, area: Rect) {
    let count = state.chrome.counters.selected;
    let enabled = if count > 0 {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let line = Line::from(vec![
        Span::styled("[t] Top  [b] Bottom  ", enabled),
        Span::styled(
            format!("[Del] Delete ({})", count),
            enabled.fg(if count > 0 { Color::Red } else { Color::DarkGray }),
        ),
    ]);
    let bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, state: &GalleryState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let message = state.message.as_deref().unwrap_or("q to quit");
    let msg_widget = Paragraph::new(format!(" {}", message))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(msg_widget, chunks[0]);

    let stats = state.stats();
    let right = if stats.selected_count > 0 {
        format!(
            "{} | {}/{}",
            state.mode.display_name(),
            stats.selected_count,
            stats.total_items
        )
    } else {
        format!("{} | {} items", state.mode.display_name(), stats.total_items)
    };
    let stats_widget = Paragraph::new(right).block(Block::default().borders(Borders::ALL));
    frame.render_widget(stats_widget, chunks[1]);
}

/// Full-screen viewer for one item
fn render_viewer(frame: &mut Frame, state: &GalleryState, item: &Item, area: Rect) {
    let position = state
        .index_of(&item.id)
        .map(|i| format!("{}/{}", i + 1, state.items.len()))
        .unwrap_or_default();
    let title = format!(" {} ({}) ", item.display_title(), position);

    let mut lines = vec![
        Line::from(vec![Span::styled(
            item.display_title(),
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(description.to_string()));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![Span::styled(
        "←/h prev  →/l next  Esc/q close",
        Style::default().fg(Color::DarkGray),
    )]));

    let viewer = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(Clear, area);
    frame.render_widget(viewer, area);
}

/// Draw a simple input popup
fn draw_input_popup(frame: &mut Frame, title: &str, content: &str) {
    let area = centered_rect(60, 3, frame.area());

    let input = Paragraph::new(content)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(Clear, area);
    frame.render_widget(input, area);
}

/// Draw confirmation popup
fn draw_confirm_popup(frame: &mut Frame, action: &PendingAction) {
    let text = match action {
        PendingAction::Delete { count } => format!("Delete {} selected items? (y/n)", count),
        PendingAction::DeleteItem { title, .. } => format!("Delete \"{}\"? (y/n)", title),
    };
    let area = centered_rect(50, 3, frame.area());

    let popup = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title("Confirm"));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
