// Interactive terminal chat. Each input line is an Enter press on the widget
// input field; a few slash commands map to the other widget actions.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use crate::model::ProductId;
use crate::render::plain_text;
use crate::widget::{ChatWidget, Key};

enum Command {
    Quit,
    Clear,
    AddToCart(ProductId),
    Send(String),
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some(("/add", id)) if !id.trim().is_empty() => {
            Command::AddToCart(id.parse().unwrap_or_else(|never| match never {}))
        }
        _ => match trimmed {
            "/quit" | "/exit" => Command::Quit,
            "/clear" => Command::Clear,
            _ => Command::Send(line.to_string()),
        },
    }
}

/// Prints transcript entries from `from` on, returning the new length.
fn print_from(widget: &ChatWidget, from: usize, currency: &str, out: &mut impl Write) -> Result<usize> {
    let messages = widget.messages();
    for message in messages.iter().skip(from) {
        writeln!(out, "{}: {}", message.sender().label(), plain_text(message, currency))
            .context("Failed to write chat output")?;
    }
    out.flush().context("Failed to flush chat output")?;
    Ok(messages.len())
}

pub async fn run_chat_session<R, W>(widget: &ChatWidget, currency: &str, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    info!("Starting chat session...");
    writeln!(out, "Commands: /add <product id>, /clear, /quit")?;
    let mut seen = print_from(widget, 0, currency, out)?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Clear => {
                widget.clear_history();
                seen = 0;
            }
            Command::AddToCart(id) => {
                widget.add_to_cart(&id).await;
            }
            Command::Send(text) => {
                widget.set_input(text);
                widget.handle_key(Key::Enter).await;
            }
        }
        seen = print_from(widget, seen, currency, out)?;
    }

    info!("Chat session finished.");
    Ok(())
}
