//! Line-oriented chat loop: reads questions, asks the gateway, prints the
//! answer with its citation and records both sides of the exchange.

use crate::{
    Result,
    config::AppConfig,
    gateway::QuestionAnswerer,
    history::ConversationHistory,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

pub const QUIT_COMMAND: &str = "/quit";
pub const PROGRESS_MESSAGE: &str = "Generating response...";

pub struct ChatSession<A> {
    answerer: A,
    app: AppConfig,
    history: ConversationHistory,
}

impl<A: QuestionAnswerer> ChatSession<A> {
    pub fn new(answerer: A, app: AppConfig, history: ConversationHistory) -> Self {
        Self {
            answerer,
            app,
            history,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn into_history(self) -> ConversationHistory {
        self.history
    }

    /// Runs until EOF or `/quit`. Gateway failures are shown to the user
    /// and the loop continues; only I/O errors end it early.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Chat session {} started", self.history.session_id());

        output
            .write_all(format!("{}\n\n", self.app.title).as_bytes())
            .await?;
        self.replay(&mut output).await?;

        let mut lines = input.lines();
        loop {
            output
                .write_all(format!("{}\n> ", self.app.prompt).as_bytes())
                .await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let question = line.trim();
            if question.is_empty() {
                continue;
            }
            if question == QUIT_COMMAND {
                break;
            }

            let reply = self.exchange(question, &mut output).await?;
            output.write_all(format!("{reply}\n\n").as_bytes()).await?;
        }

        output.flush().await?;
        info!(
            "Chat session {} ended after {} turns",
            self.history.session_id(),
            self.history.len()
        );
        Ok(())
    }

    async fn exchange<W>(&mut self, question: &str, output: &mut W) -> Result<String>
    where
        W: AsyncWrite + Unpin,
    {
        self.history.push_user(question);

        output
            .write_all(format!("{PROGRESS_MESSAGE}\n").as_bytes())
            .await?;
        output.flush().await?;

        match self.answerer.ask(question).await {
            Ok(answer) => {
                let reply = answer.to_string();
                self.history.push_assistant(reply.clone());
                Ok(reply)
            }
            Err(e) => {
                warn!("Failed to answer question: {}", e);
                Ok(format!("Sorry, I could not get an answer: {e}"))
            }
        }
    }

    async fn replay<W>(&self, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        for turn in self.history.turns() {
            output
                .write_all(format!("[{}] {}\n\n", turn.role, turn.content).as_bytes())
                .await?;
        }
        Ok(())
    }
}
