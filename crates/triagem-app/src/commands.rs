//! Front-end command handlers. Each one drives the presenters in
//! [`AppState`] the way the corresponding screen would and prints the
//! result.

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use jiff::Timestamp;

use triagem_core::validation::Field;

use crate::input::LineSource;
use crate::messages;
use crate::notice::Notice;
use crate::queue::Confirmation;
use crate::render::{render_notice, render_queue};
use crate::state::AppState;

/// Terminal output settings shared by all commands.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub color: bool,
    /// How long to wait for the first snapshot before giving up.
    pub snapshot_wait: Duration,
}

fn print_notice(notice: Option<&Notice>, output: Output) {
    if let Some(notice) = notice {
        eprintln!("{}", render_notice(notice, output.color));
    }
}

fn print_queue(state: &AppState, output: Output) {
    print!("{}", render_queue(&state.queue.rows(), output.color));
}

/// Answers accepted as "yes" on a confirmation prompt.
fn is_affirmative(answer: &str, confirmation: &Confirmation) -> bool {
    let answer = answer.trim().to_lowercase();
    matches!(answer.as_str(), "s" | "sim" | "y" | "yes")
        || answer == confirmation.confirm_label().to_lowercase()
}

fn prompt_text(confirmation: &Confirmation) -> String {
    format!(
        "{}: {} [{}/{}] ",
        confirmation.title(),
        confirmation.prompt(),
        confirmation.confirm_label(),
        confirmation.cancel_label()
    )
}

fn confirm_on_stdin(confirmation: &Confirmation) -> eyre::Result<bool> {
    print!("{}", prompt_text(confirmation));
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(is_affirmative(&line, confirmation))
}

pub async fn add(
    state: &mut AppState,
    name: String,
    age: String,
    description: String,
    severity: String,
    output: Output,
) -> eyre::Result<ExitCode> {
    state.intake.set_field(Field::Name, name);
    state.intake.set_field(Field::Age, age);
    state.intake.set_field(Field::Description, description);
    state.intake.set_field(Field::Severity, severity);

    let result = state.submit_intake().await;
    print_notice(state.intake.notice(Timestamp::now()), output);
    match result {
        Ok(id) => {
            println!("{id}");
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

pub async fn list(state: &mut AppState, output: Output) -> eyre::Result<ExitCode> {
    if let Err(e) = state.refresh(output.snapshot_wait).await {
        eprintln!("{}", e.user_message());
        return Ok(ExitCode::FAILURE);
    }
    print_queue(state, output);
    Ok(ExitCode::SUCCESS)
}

/// Delete the patient at a 1-based queue position.
pub async fn delete(
    state: &mut AppState,
    position: usize,
    assume_yes: bool,
    output: Output,
) -> eyre::Result<ExitCode> {
    if let Err(e) = state.refresh(output.snapshot_wait).await {
        eprintln!("{}", e.user_message());
        return Ok(ExitCode::FAILURE);
    }

    // Position 0 selects nothing, which the presenter reports as such.
    if let Some(index) = position.checked_sub(1)
        && let Err(e) = state.queue.select(index)
    {
        eprintln!("{}", e.user_message());
        return Ok(ExitCode::FAILURE);
    }

    let confirmation = match state.queue.request_delete() {
        Ok(confirmation) => confirmation,
        Err(_) => {
            print_notice(state.queue.notice(Timestamp::now()), output);
            return Ok(ExitCode::FAILURE);
        }
    };

    if !assume_yes && !confirm_on_stdin(&confirmation)? {
        return Ok(ExitCode::SUCCESS);
    }

    finish_confirmation(state, confirmation, output).await
}

pub async fn clear(state: &mut AppState, assume_yes: bool, output: Output) -> eyre::Result<ExitCode> {
    if let Err(e) = state.refresh(output.snapshot_wait).await {
        eprintln!("{}", e.user_message());
        return Ok(ExitCode::FAILURE);
    }

    let confirmation = state.queue.request_clear_all();
    if !assume_yes && !confirm_on_stdin(&confirmation)? {
        return Ok(ExitCode::SUCCESS);
    }

    finish_confirmation(state, confirmation, output).await
}

async fn finish_confirmation(
    state: &mut AppState,
    confirmation: Confirmation,
    output: Output,
) -> eyre::Result<ExitCode> {
    match state.confirm(confirmation).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(_) => {
            print_notice(state.queue.notice(Timestamp::now()), output);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Re-render the queue on every snapshot until Ctrl-C.
pub async fn watch(state: &mut AppState, output: Output) -> eyre::Result<ExitCode> {
    let mut feed = state.watch();

    loop {
        tokio::select! {
            snapshot = feed.next() => {
                let Some(records) = snapshot else { break };
                state.queue.apply_snapshot(records);
                println!("--- {} ---", Timestamp::now());
                print_queue(state, output);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    feed.close();
    tracing::debug!("watch subscription released");
    Ok(ExitCode::SUCCESS)
}

const SHELL_HELP: &str = "\
comandos:
  add NOME; IDADE; DESCRIÇÃO; GRAVIDADE   cadastrar paciente
  list                                    mostrar a fila
  select N                                selecionar/desmarcar paciente N
  delete                                  excluir o paciente selecionado
  clear                                   limpar todos os pacientes
  help                                    esta ajuda
  quit                                    sair";

/// Interactive session: one event loop handling user input and store
/// snapshots, with a single state container for both screens.
pub async fn shell(state: &mut AppState, output: Output) -> eyre::Result<ExitCode> {
    let mut feed = state.watch();
    let mut lines = LineSource::stdin()?;
    let mut session = ShellSession::default();

    println!("{SHELL_HELP}");

    loop {
        tokio::select! {
            snapshot = feed.next() => {
                let Some(records) = snapshot else { break };
                state.queue.apply_snapshot(records);
                print_queue(state, output);
            }
            line = lines.next_line() => {
                let Some(line) = line else { break };
                if session.handle_line(state, &line?, output).await? == ShellStep::Quit {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    feed.close();
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellStep {
    Continue,
    Quit,
}

enum LineAction {
    Done,
    Confirm(Confirmation),
    Quit,
}

/// Per-session shell state: the confirmation awaiting an answer, if any.
#[derive(Debug, Default)]
pub struct ShellSession {
    pending: Option<Confirmation>,
}

impl ShellSession {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle one input line. While a confirmation is pending the line is
    /// its answer; otherwise it is a command. Notices raised by the line are
    /// printed once and then cleared.
    pub async fn handle_line(
        &mut self,
        state: &mut AppState,
        line: &str,
        output: Output,
    ) -> eyre::Result<ShellStep> {
        let action = match self.pending.take() {
            Some(confirmation) => {
                if is_affirmative(line, &confirmation) {
                    // Failures are reported through the queue notice.
                    let _ = state.confirm(confirmation).await;
                }
                LineAction::Done
            }
            None => run_shell_line(state, line.trim(), output).await,
        };

        let step = match action {
            LineAction::Done => ShellStep::Continue,
            LineAction::Confirm(confirmation) => {
                print!("{}", prompt_text(&confirmation));
                std::io::stdout().flush()?;
                self.pending = Some(confirmation);
                ShellStep::Continue
            }
            LineAction::Quit => ShellStep::Quit,
        };

        let now = Timestamp::now();
        print_notice(state.intake.notice(now), output);
        print_notice(state.queue.notice(now), output);
        state.intake.notices().clear();
        state.queue.notices().clear();
        Ok(step)
    }
}

async fn run_shell_line(state: &mut AppState, line: &str, output: Output) -> LineAction {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "" => LineAction::Done,
        "add" => {
            let mut parts = rest.split(';');
            let fields = [Field::Name, Field::Age, Field::Description, Field::Severity];
            for field in fields {
                state
                    .intake
                    .set_field(field, parts.next().unwrap_or_default().trim());
            }
            // Failures are reported through the intake notice.
            let _ = state.submit_intake().await;
            LineAction::Done
        }
        "list" => {
            print_queue(state, output);
            LineAction::Done
        }
        "select" => {
            let Some(index) = rest.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1))
            else {
                eprintln!("{}", messages::UNKNOWN_POSITION);
                return LineAction::Done;
            };
            match state.queue.select(index) {
                Ok(selection) => {
                    tracing::debug!(?selection, "selection changed");
                    print_queue(state, output);
                }
                Err(e) => eprintln!("{}", e.user_message()),
            }
            LineAction::Done
        }
        "delete" => match state.queue.request_delete() {
            Ok(confirmation) => LineAction::Confirm(confirmation),
            Err(_) => LineAction::Done,
        },
        "clear" => LineAction::Confirm(state.queue.request_clear_all()),
        "help" => {
            println!("{SHELL_HELP}");
            LineAction::Done
        }
        "quit" | "sair" | "exit" => LineAction::Quit,
        other => {
            eprintln!("comando desconhecido: {other} (use help)");
            LineAction::Done
        }
    }
}
