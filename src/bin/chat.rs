//! Terminal host for the chat widget
//!
//! Reads one message per line from stdin and prints bot replies as they are
//! appended. Set `CHAT_WIDGET_ECHO=1` to answer locally instead of calling the
//! configured endpoint.

use chat_widget::transport::HandlerError;
use chat_widget::{ChatWidget, WidgetConfig, WidgetEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_widget=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = WidgetConfig::from_env();
    let echo = std::env::var("CHAT_WIDGET_ECHO").is_ok_and(|v| !v.is_empty() && v != "0");

    let builder = ChatWidget::builder(config);
    let widget = if echo {
        builder
            .with_handler(|text, _session| async move {
                Ok::<_, HandlerError>(format!("You said: {text}"))
            })
            .build()?
    } else {
        builder.build()?
    };

    println!("{} - {}", widget.config().title, widget.config().subtitle);
    for message in widget.messages() {
        println!("{}: {}", message.sender, message.text);
    }

    let mut events = BroadcastStream::new(widget.subscribe());
    let printer = tokio::spawn(async move {
        while let Some(event) = events.next().await {
            match event {
                Ok(WidgetEvent::MessageAppended { message }) if !message.is_user() => {
                    println!("{}: {}", message.sender, message.text);
                }
                Ok(WidgetEvent::PendingChanged { pending: true }) => println!("..."),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Missed widget events"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        widget.submit(&line).await;
    }

    // Closing the channel ends the printer
    drop(widget);
    printer.await?;

    Ok(())
}
