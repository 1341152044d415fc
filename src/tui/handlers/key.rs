// Key dispatch for the main and config screens.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::api::CatalogSource;
use crate::catalog::Step;
use crate::config::ConfigStore;
use crate::errors::CliError;
use crate::launcher::Launcher;
use crate::session::{Session, TextField};
use crate::tui::Suspend;
use crate::tui::types::{App, ConfigField, ConfigState, MainState, Screen, SlotField};

pub async fn handle_event<R, S, C, L, T>(
    app: &mut App<R>,
    session: &mut Session<S, C, L>,
    term: &mut T,
    event: Event,
) -> Result<(), CliError>
where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
    T: Suspend,
{
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            handle_key(app, session, term, key).await?;
        }
        _ => {}
    }
    Ok(())
}

pub async fn handle_key<R, S, C, L, T>(
    app: &mut App<R>,
    session: &mut Session<S, C, L>,
    term: &mut T,
    key: KeyEvent,
) -> Result<(), CliError>
where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
    T: Suspend,
{
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        app.should_exit = true;
        return Ok(());
    }

    match app.screen {
        Screen::Main(state) => handle_main_key(app, session, term, state, key).await,
        Screen::Config(state) => {
            handle_config_key(app, session, state, key, ctrl).await;
            Ok(())
        }
    }
}

// ============================================================================
// Main screen
// ============================================================================

async fn handle_main_key<R, S, C, L, T>(
    app: &mut App<R>,
    session: &mut Session<S, C, L>,
    term: &mut T,
    mut state: MainState,
    key: KeyEvent,
) -> Result<(), CliError>
where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
    T: Suspend,
{
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_exit = true,
        KeyCode::Char('c') | KeyCode::Char('C') => {
            session.clear_status();
            let config = session.config();
            app.screen = Screen::Config(ConfigState::enter(
                state,
                &config.base_url,
                &config.api_key,
            ));
            return Ok(());
        }
        KeyCode::Char('b') | KeyCode::Char('B') => session.refresh().await,
        KeyCode::Up => state.move_up(),
        KeyCode::Down => state.move_down(),
        KeyCode::Left => state.field = SlotField::Owner,
        KeyCode::Right => state.field = SlotField::Model,
        KeyCode::Char('[') | KeyCode::Char('a') => cycle(session, state, Step::Back),
        KeyCode::Char(']') | KeyCode::Char('d') => cycle(session, state, Step::Forward),
        KeyCode::Enter => hand_off(app, session, term).await?,
        _ => {}
    }
    app.screen = Screen::Main(state);
    Ok(())
}

fn cycle<S, C, L>(session: &mut Session<S, C, L>, state: MainState, step: Step)
where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
{
    match state.field {
        SlotField::Owner => session.cycle_owner(state.slot(), step),
        SlotField::Model => session.cycle_model(state.slot(), step),
    }
}

/// Gives the terminal to the launched program and takes it back. Only a
/// clean exit of the program ends the launcher.
async fn hand_off<R, S, C, L, T>(
    app: &mut App<R>,
    session: &mut Session<S, C, L>,
    term: &mut T,
) -> Result<(), CliError>
where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
    T: Suspend,
{
    if let Err(err) = session.validate_launch() {
        session.set_status(err.to_string());
        return Ok(());
    }

    if let Err(err) = term.suspend() {
        // Restore the UI even when suspend stopped partway.
        let _ = term.resume();
        return Err(err);
    }
    let result = session.launch().await;
    term.resume()?;

    match result {
        Ok(()) => app.should_exit = true,
        Err(err) => {
            tracing::warn!(error = %err, "launch failed");
            session.set_status(err.to_string());
        }
    }
    Ok(())
}

// ============================================================================
// Config screen
// ============================================================================

async fn handle_config_key<R, S, C, L>(
    app: &mut App<R>,
    session: &mut Session<S, C, L>,
    mut state: ConfigState,
    key: KeyEvent,
    ctrl: bool,
) where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
{
    match key.code {
        KeyCode::Esc => {
            session.persist();
            app.screen = Screen::Main(state.return_to);
            session.refresh().await;
            return;
        }
        KeyCode::Up => state.move_up(),
        KeyCode::Down => state.move_down(),
        _ => match state.field() {
            ConfigField::Toggle(toggle) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    session.flip_toggle(toggle);
                }
            }
            ConfigField::Text(field) => edit_text(session, &mut state, field, key, ctrl),
        },
    }
    app.screen = Screen::Config(state);
}

fn edit_text<S, C, L>(
    session: &mut Session<S, C, L>,
    state: &mut ConfigState,
    field: TextField,
    key: KeyEvent,
    ctrl: bool,
) where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
{
    let mut input: Vec<char> = session.text(field).chars().collect();
    let mut cursor = state.cursor(field).min(input.len());

    match key.code {
        KeyCode::Backspace => {
            if cursor > 0 {
                cursor -= 1;
                input.remove(cursor);
                session.set_text(field, input.iter().collect());
            }
        }
        KeyCode::Left => cursor = cursor.saturating_sub(1),
        KeyCode::Right => cursor = (cursor + 1).min(input.len()),
        KeyCode::Home => cursor = 0,
        KeyCode::End => cursor = input.len(),
        KeyCode::Char(ch) => {
            if ctrl || ch.is_control() {
                return;
            }
            input.insert(cursor, ch);
            cursor += 1;
            session.set_text(field, input.iter().collect());
        }
        _ => {}
    }
    state.set_cursor(field, cursor);
}
