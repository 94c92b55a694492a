//! Interactive REPL for the MCP Gateway.
//!
//! Launch with `mcp-gateway repl` to send envelopes to an in-process handler.
//! Type `/help` for available commands, Tab for completion.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::Value;
use tokio::runtime::Handle;

use crate::protocol::RequestHandler;
use crate::types::{
    InvokeRequest, Parameters, RequestEnvelope, StreamRequest, SERVER_NAME, SERVER_VERSION,
};

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/heartbeat", "Send a heartbeat envelope"),
    ("/invoke", "Invoke an operation: /invoke <operation> [json parameters]"),
    ("/stream", "Send a stream envelope: /stream [operation]"),
    ("/operations", "List advertised operations"),
    ("/send", "Send a raw JSON envelope"),
    ("/openapi", "Print the OpenAPI document"),
    ("/info", "Show server information"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
struct GatewayHelper {
    operations: Vec<String>,
}

impl Completer for GatewayHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        // Operation name completion
        let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
        if (cmd == "/invoke" || cmd == "/stream") && !args.trim_start().contains(' ') {
            let prefix_start = input.len() - args.trim_start().len();
            let matches: Vec<Pair> = self
                .operations
                .iter()
                .filter(|op| op.starts_with(args.trim_start()))
                .map(|op| Pair {
                    display: op.clone(),
                    replacement: format!("{op} "),
                })
                .collect();
            return Ok((prefix_start, matches));
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for GatewayHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for GatewayHelper {}
impl Validator for GatewayHelper {}
impl Helper for GatewayHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Session state.
struct ReplState {
    handler: RequestHandler,
    runtime: Handle,
    sequence: u64,
}

impl ReplState {
    fn next_request_id(&mut self) -> String {
        self.sequence += 1;
        format!("repl-{}", self.sequence)
    }

    /// Send an envelope through the full payload path and print the reply.
    fn send(&self, envelope: &RequestEnvelope) {
        match mcp_envelope::encode_request(envelope) {
            Ok(payload) => self.send_raw(&payload),
            Err(e) => eprintln!("  Failed to encode envelope: {e}"),
        }
    }

    fn send_raw(&self, payload: &[u8]) {
        let reply = self.runtime.block_on(self.handler.handle_payload(payload));
        eprintln!();
        eprintln!("  \x1b[90mHTTP {}\x1b[0m", reply.status.http_status());
        match serde_json::from_slice::<Value>(&reply.body) {
            Ok(value) => {
                let pretty = serde_json::to_string_pretty(&value).unwrap_or_default();
                for line in pretty.lines() {
                    eprintln!("  {line}");
                }
            }
            Err(_) => eprintln!("  {}", String::from_utf8_lossy(&reply.body)),
        }
        eprintln!();
    }
}

/// Run the interactive REPL. Must be called off the async runtime threads
/// (e.g. from `spawn_blocking`); `runtime` drives the handler.
pub fn run(handler: RequestHandler, runtime: Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1m{SERVER_NAME} v{SERVER_VERSION}\x1b[0m \x1b[90m\u{2014} MCP envelope console\x1b[0m"
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let operations = handler.registry().names().map(str::to_string).collect();

    let mut rl: Editor<GatewayHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(GatewayHelper { operations }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".mcp_gateway_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let mut state = ReplState {
        handler,
        runtime,
        sequence: 0,
    };
    let prompt = " \x1b[36mmcp>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let (cmd, args) = input.split_once(' ').unwrap_or((input, ""));
                let args = args.trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&state),
                    "heartbeat" => cmd_heartbeat(&mut state),
                    "invoke" => cmd_invoke(args, &mut state),
                    "stream" => cmd_stream(args, &mut state),
                    "operations" | "ops" => cmd_invoke(crate::operations::list_operations::NAME, &mut state),
                    "openapi" => cmd_invoke(crate::operations::openapi::NAME, &mut state),
                    "send" => cmd_send(args, &state),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = std::fs::create_dir_all(hist_path.parent().unwrap_or(std::path::Path::new(".")));
    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completion works for commands and operation names.");
    eprintln!();
}

fn cmd_info(state: &ReplState) {
    let registry = state.handler.registry();
    let config = state.handler.config();
    eprintln!();
    eprintln!("  Server:      {SERVER_NAME} v{SERVER_VERSION}");
    eprintln!("  Operations:  {}", registry.len());
    for def in registry.definitions() {
        eprintln!("    {:<20} {}", def.name, def.description);
    }
    eprintln!("  Advertised:  {}", config.allowed_operations);
    eprintln!("  Latency:     {}ms", config.simulated_latency.as_millis());
    eprintln!();
}

fn cmd_heartbeat(state: &mut ReplState) {
    let envelope = RequestEnvelope {
        request_id: Some(state.next_request_id()),
        message_type: "heartbeat".to_string(),
        invoke_request: None,
        stream_request: None,
    };
    state.send(&envelope);
}

fn cmd_invoke(args: &str, state: &mut ReplState) {
    let (operation, raw_params) = args.split_once(' ').unwrap_or((args, ""));
    if operation.is_empty() {
        eprintln!("  Usage: /invoke <operation> [json parameters]");
        return;
    }

    let parameters = match parse_parameters(raw_params) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("  Parameters must be a JSON object: {e}");
            return;
        }
    };

    let envelope = RequestEnvelope {
        request_id: Some(state.next_request_id()),
        message_type: "invoke".to_string(),
        invoke_request: Some(InvokeRequest::new(operation, parameters)),
        stream_request: None,
    };
    state.send(&envelope);
}

fn cmd_stream(args: &str, state: &mut ReplState) {
    let stream_request = (!args.is_empty()).then(|| StreamRequest {
        operation: Some(args.to_string()),
        parameters: Parameters::new(),
    });
    let envelope = RequestEnvelope {
        request_id: Some(state.next_request_id()),
        message_type: "stream".to_string(),
        invoke_request: None,
        stream_request,
    };
    state.send(&envelope);
}

fn cmd_send(args: &str, state: &ReplState) {
    if args.is_empty() {
        eprintln!("  Usage: /send <json envelope>");
        return;
    }
    state.send_raw(args.as_bytes());
}

fn parse_parameters(raw: &str) -> Result<Parameters, serde_json::Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Parameters::new());
    }
    serde_json::from_str(raw)
}
