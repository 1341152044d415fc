use std::io::{self, Stdout};
use std::time::Duration;

use clap::Args;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::CatalogSource;
use crate::app::Runtime;
use crate::config::ConfigStore;
use crate::errors::CliError;
use crate::launcher::Launcher;
use crate::session::Session;
use crate::tui::animation::{RenderState, color_supported};
use crate::tui::handlers::handle_event;
use crate::tui::render;
use crate::tui::{App, Suspend};

const FRAME_MS: u64 = 50;

#[derive(Debug, Args)]
pub struct TuiArgs {
    /// Arguments passed through to the launched program.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Raw mode plus the alternate screen for as long as the value lives.
struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    fn enter() -> Result<Self, CliError> {
        enable_raw_mode()
            .map_err(|e| CliError::Terminal(format!("Failed to enable raw mode: {e}")))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| CliError::Terminal(format!("Failed to enter alternate screen: {e}")))?;

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)
            .map_err(|e| CliError::Terminal(format!("Failed to init terminal: {e}")))?;
        terminal
            .clear()
            .map_err(|e| CliError::Terminal(format!("Failed to clear terminal: {e}")))?;
        terminal
            .hide_cursor()
            .map_err(|e| CliError::Terminal(format!("Failed to hide cursor: {e}")))?;
        Ok(Self { terminal })
    }
}

impl Suspend for Tui {
    fn suspend(&mut self) -> Result<(), CliError> {
        tracing::debug!("suspending terminal");
        disable_raw_mode()
            .map_err(|e| CliError::Terminal(format!("Failed to disable raw mode: {e}")))?;
        execute!(io::stdout(), Show, LeaveAlternateScreen)
            .map_err(|e| CliError::Terminal(format!("Failed to leave alternate screen: {e}")))?;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), CliError> {
        tracing::debug!("resuming terminal");
        enable_raw_mode()
            .map_err(|e| CliError::Terminal(format!("Failed to enable raw mode: {e}")))?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .map_err(|e| CliError::Terminal(format!("Failed to enter alternate screen: {e}")))?;
        self.terminal
            .clear()
            .map_err(|e| CliError::Terminal(format!("Failed to clear terminal: {e}")))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    }
}

pub async fn handle(runtime: &Runtime, args: TuiArgs) -> Result<(), CliError> {
    if runtime.output.json {
        return Err(CliError::Usage(
            "`--json` is only supported by `ccode models` and `ccode env`.".to_string(),
        ));
    }

    let mut session = Session::new(
        runtime.store(),
        runtime.api_client()?,
        runtime.launcher(),
        args.args,
    );
    let render = RenderState::new(
        StdRng::from_entropy(),
        color_supported(runtime.output.no_color),
    );
    let mut app = App::new(render);
    tracing::info!(
        config = %runtime.config_path.display(),
        program = %runtime.program,
        style = ?app.render.style,
        "starting launcher"
    );

    let mut tui = Tui::enter()?;
    session.refresh().await;
    run(&mut tui, &mut app, &mut session).await
}

async fn run<S, C, L>(
    tui: &mut Tui,
    app: &mut App<StdRng>,
    session: &mut Session<S, C, L>,
) -> Result<(), CliError>
where
    S: ConfigStore,
    C: CatalogSource,
    L: Launcher,
{
    loop {
        if app.should_exit {
            break;
        }
        tui.terminal
            .draw(|f| render::draw(f, app, session))
            .map_err(|e| CliError::Terminal(format!("Failed to draw: {e}")))?;

        if event::poll(Duration::from_millis(FRAME_MS))
            .map_err(|e| CliError::Terminal(format!("Event poll failed: {e}")))?
        {
            let event = event::read()
                .map_err(|e| CliError::Terminal(format!("Event read failed: {e}")))?;
            if matches!(event, Event::Resize(..)) {
                continue;
            }
            if let Err(err) = handle_event(app, session, tui, event).await {
                tracing::warn!(error = %err, "key handler failed");
                session.set_status(err.to_string());
            }
        }
        app.render.tick();
    }
    Ok(())
}
