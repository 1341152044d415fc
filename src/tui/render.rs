use rand::Rng;
use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use unicode_width::UnicodeWidthStr;

use crate::api::CatalogSource;
use crate::config::{ConfigStore, Slot, Toggle};
use crate::errors::mask_secret;
use crate::launcher::Launcher;
use crate::session::{Session, TextField};

use super::animation::RenderState;
use super::canvas::Canvas;
use super::types::{App, ConfigField, ConfigState, MainState, Screen, SlotField};

pub const MAIN_HINT: &str =
    "enter to start, c to config, b to refresh, a/d to change owned_by/model_id, q to quit";
pub const CONFIG_HINT: &str = "esc to save and go back, up/down to move, enter/space to toggle";

const LOGO_TOP: i32 = 1;
const LABEL_WIDTH: usize = 8;
const CONFIG_WIDTH: i32 = 60;

fn focused(on: bool) -> Style {
    if on {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

pub fn draw<R, S, C, L>(frame: &mut Frame<'_>, app: &mut App<R>, session: &Session<S, C, L>)
where
    R: Rng,
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
{
    let cursor = {
        let mut canvas = Canvas::new(frame.buffer_mut());
        paint_screen(&mut canvas, app, session);
        canvas.cursor()
    };
    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

pub fn paint_screen<R, S, C, L>(canvas: &mut Canvas<'_>, app: &mut App<R>, session: &Session<S, C, L>)
where
    R: Rng,
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
{
    match app.screen {
        Screen::Main(state) => render_main(canvas, &mut app.render, state, session),
        Screen::Config(state) => render_config(canvas, state, session),
    }
}

// ============================================================================
// Main screen
// ============================================================================

fn render_main<R, S, C, L>(
    canvas: &mut Canvas<'_>,
    render: &mut RenderState<R>,
    state: MainState,
    session: &Session<S, C, L>,
) where
    R: Rng,
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
{
    canvas.hide_cursor();
    render.draw_logo(canvas, LOGO_TOP);
    let mut y = LOGO_TOP + render.logo_height() as i32 + 1;

    let config = session.config();
    let rows: Vec<(String, &str, &str)> = Slot::ALL
        .iter()
        .map(|slot| {
            let binding = config.models.get(*slot);
            let label = format!("{:<LABEL_WIDTH$}", format!("{}:", slot.label()));
            let owner = binding.owner.as_deref().unwrap_or("owned_by");
            let model = binding.id.as_deref().unwrap_or("model_id");
            (label, owner, model)
        })
        .collect();

    let widest_row = rows
        .iter()
        .map(|(label, owner, model)| label.width() + 1 + owner.width() + 3 + model.width())
        .max()
        .unwrap_or(0);
    let content_width = widest_row
        .max(MAIN_HINT.width())
        .max(session.status().width()) as i32;
    let x = ((i32::from(canvas.width()) - content_width) / 2).max(2);

    for (idx, (label, owner, model)) in rows.iter().enumerate() {
        let on_row = idx == state.row;
        canvas.paint(y, x, label, Style::default());
        let owner_x = x + label.width() as i32 + 1;
        canvas.paint(y, owner_x, owner, focused(on_row && state.field == SlotField::Owner));
        let sep_x = owner_x + owner.width() as i32;
        canvas.paint(y, sep_x, " | ", Style::default());
        let model_x = sep_x + 3;
        canvas.paint(y, model_x, model, focused(on_row && state.field == SlotField::Model));
        y += 1;
    }

    y += 1;
    canvas.paint(y, x, MAIN_HINT, Style::default().add_modifier(Modifier::DIM));
    y += 1;
    if !session.status().is_empty() {
        canvas.paint(y, x, session.status(), Style::default());
    }
}

// ============================================================================
// Config screen
// ============================================================================

fn render_config<S, C, L>(canvas: &mut Canvas<'_>, state: ConfigState, session: &Session<S, C, L>)
where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
{
    let x = ((i32::from(canvas.width()) - CONFIG_WIDTH) / 2).max(2);
    let mut y = 1;
    let field = state.field();

    y = section(canvas, x, y, "Credentials");

    let mut text_rows = Vec::new();
    for (text_field, label) in [(TextField::BaseUrl, "BASE_URL:"), (TextField::ApiKey, "API_KEY:")] {
        let value = session.text(text_field);
        let on = field == ConfigField::Text(text_field);
        let display = match text_field {
            _ if on => value.to_string(),
            TextField::BaseUrl if value.is_empty() => "<unset>".to_string(),
            TextField::BaseUrl => value.to_string(),
            TextField::ApiKey => mask_secret(value),
        };
        let value_x = x + label.width() as i32 + 1;
        canvas.paint(y, x, label, Style::default());
        canvas.paint(y, value_x, &display, focused(on));
        text_rows.push((text_field, y, value_x));
        y += 1;
    }

    y += 1;
    y = section(canvas, x, y, "Toggles");

    for toggle in Toggle::ALL {
        let label = format!("{}:", toggle.label());
        let value = if session.config().toggle(toggle) { "ON" } else { "OFF" };
        canvas.paint(y, x, &label, Style::default());
        canvas.paint(
            y,
            x + label.width() as i32 + 1,
            value,
            focused(field == ConfigField::Toggle(toggle)),
        );
        y += 1;
    }

    y += 1;
    canvas.paint(y, x, CONFIG_HINT, Style::default().add_modifier(Modifier::DIM));
    y += 1;
    if !session.status().is_empty() {
        canvas.paint(y, x, session.status(), Style::default());
    }

    match field {
        ConfigField::Text(text_field) => {
            let len = session.text(text_field).chars().count();
            let cursor = state.cursor(text_field).min(len);
            if let Some((_, row, value_x)) = text_rows.iter().find(|(f, _, _)| *f == text_field) {
                canvas.place_cursor(*row, value_x + cursor as i32);
            }
        }
        ConfigField::Toggle(_) => canvas.hide_cursor(),
    }
}

fn section(canvas: &mut Canvas<'_>, x: i32, y: i32, title: &str) -> i32 {
    canvas.paint(y, x, "-----", Style::default());
    canvas.paint(y + 1, x, title, Style::default().add_modifier(Modifier::BOLD));
    canvas.paint(y + 2, x, "-----", Style::default());
    y + 3
}
