//! Line-oriented chat loop over any async reader and writer.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use lagent::{TurnEvent, TurnOrchestrator, TurnRequest};
use lcommon::SessionId;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

pub const USER_PROMPT: &str = "You > ";
pub const BOT_PROMPT: &str = "Bot > ";
pub const EXIT_COMMAND: &str = "/exit";

#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    pub session_id: SessionId,
    pub streaming: bool,
    pub model: Option<String>,
}

impl ConsoleOptions {
    pub fn new(session_id: impl Into<SessionId>) -> Self {
        Self {
            session_id: session_id.into(),
            streaming: true,
            model: None,
        }
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model.filter(|model| !model.trim().is_empty());
        self
    }
}

/// Handle for cancelling whichever turn is currently in flight.
#[derive(Debug, Clone, Default)]
pub struct TurnInterrupt {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl TurnInterrupt {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if let Ok(mut current) = self.current.lock() {
            *current = Some(token.clone());
        }
        token
    }

    fn finish(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }

    /// Cancels the in-flight turn. Returns `false` when the console is idle.
    pub fn interrupt(&self) -> bool {
        let Ok(current) = self.current.lock() else {
            return false;
        };
        match current.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

pub fn banner(provider: &str, session_id: &SessionId) -> String {
    format!(
        "Loquat chat console ({provider})\n\
         Session: {session_id}\n\
         Ask about your calendar, e.g. 'What's on my calendar today?'\n\
         Type '{EXIT_COMMAND}' to quit\n"
    )
}

/// Reads lines until end of input, `/exit`, or `shutdown`. Turn failures are
/// printed and the loop continues.
pub async fn run_repl<R, W>(
    orchestrator: &TurnOrchestrator,
    options: &ConsoleOptions,
    input: R,
    output: &mut W,
    interrupt: &TurnInterrupt,
    shutdown: &CancellationToken,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        output.write_all(USER_PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = shutdown.run_until_cancelled(lines.next_line()).await else {
            output.write_all(b"\n").await?;
            break;
        };
        let Some(line) = line? else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }

        let mut request = TurnRequest::new(options.session_id.clone(), line)
            .with_cancellation(interrupt.begin());
        if let Some(model) = options.model.as_deref() {
            request = request.with_model(model);
        }

        output.write_all(BOT_PROMPT.as_bytes()).await?;
        output.flush().await?;
        let outcome = if options.streaming {
            stream_turn(orchestrator, request, output).await
        } else {
            blocking_turn(orchestrator, request, output).await
        };
        interrupt.finish();
        outcome?;
    }

    output.flush().await
}

async fn stream_turn<W>(
    orchestrator: &TurnOrchestrator,
    request: TurnRequest,
    output: &mut W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut events = orchestrator.stream(request);
    while let Some(event) = events.next().await {
        match event {
            Ok(TurnEvent::Fragment(fragment)) => {
                output.write_all(fragment.as_bytes()).await?;
                output.flush().await?;
            }
            Ok(TurnEvent::Completed(_)) => output.write_all(b"\n\n").await?,
            Err(error) if error.is_cancelled() => output.write_all(b"\n[cancelled]\n\n").await?,
            Err(error) => {
                output
                    .write_all(format!("\nError: {}\n\n", error.message).as_bytes())
                    .await?
            }
        }
    }
    Ok(())
}

async fn blocking_turn<W>(
    orchestrator: &TurnOrchestrator,
    request: TurnRequest,
    output: &mut W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = match orchestrator.handle(request).await {
        Ok(turn) => format!("{}\n\n", turn.final_text),
        Err(error) if error.is_cancelled() => "[cancelled]\n\n".to_string(),
        Err(error) => format!("\nError: {}\n\n", error.message),
    };
    output.write_all(line.as_bytes()).await
}
