use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use cmd_prompt::{Prompt, PromptPool, Transport};

use shellport::commands;
use shellport::config::ShellConfig;
use shellport::console::ConsoleTransport;
use shellport::errors::{ShellError, ShellResult};
use shellport::net;

/// Shellport entry point
fn main() -> ShellResult<()> {
    // Load configuration
    let config = match ShellConfig::load_from_file("shellport.conf") {
        Ok(config) => {
            println!("Configuration loaded from shellport.conf");
            config
        }
        Err(e) => {
            eprintln!("Config error: {}. Using defaults.", e);
            ShellConfig::default()
        }
    };

    print_startup_banner(&config);

    if config.server.enabled {
        serve(config)
    } else {
        run_console(&config)
    }
}

/// Accept Telnet connections and serve each on its own thread.
fn serve(config: ShellConfig) -> ShellResult<()> {
    let bind_addr = format!(
        "{}:{}",
        config.server.bind_address, config.server.telnet_port
    );
    let listener = TcpListener::bind(&bind_addr)?;
    // Non-blocking so a `Quit` from any session stops the accept loop too
    listener.set_nonblocking(true)?;

    println!("> {} listening on {}", config.info.name, bind_addr);
    println!(
        "> Connect with: telnet {} {}",
        config.server.bind_address, config.server.telnet_port
    );
    println!("> Operator: {}", config.info.operator);
    println!("\nPress Ctrl+C to stop the server\n");

    let config = Arc::new(config);
    let connection_count = Arc::new(AtomicU32::new(0));
    let mut connection_id = 0u32;

    while !commands::shutdown_requested() {
        match listener.accept() {
            Ok((stream, peer_addr)) => {
                connection_id += 1;
                let current_connections = connection_count.fetch_add(1, Ordering::Relaxed) + 1;

                if current_connections as usize > config.server.max_connections {
                    eprintln!(
                        "! Connection limit reached ({}/{}), rejecting {}",
                        current_connections, config.server.max_connections, peer_addr
                    );
                    let _ = show_rejection(stream);
                    connection_count.fetch_sub(1, Ordering::Relaxed);
                    continue;
                }

                println!(
                    "> New connection #{} from: {} ({}/{})",
                    connection_id, peer_addr, current_connections, config.server.max_connections
                );

                let config = Arc::clone(&config);
                let conn_counter = Arc::clone(&connection_count);

                thread::spawn(move || match net::run_session(stream, &config) {
                    Ok(()) => {
                        let remaining = conn_counter.fetch_sub(1, Ordering::Relaxed) - 1;
                        println!(
                            "> Client {} disconnected ({} connections remaining)",
                            peer_addr, remaining
                        );
                    }
                    Err(e) => {
                        let remaining = conn_counter.fetch_sub(1, Ordering::Relaxed) - 1;
                        eprintln!(
                            "! Error handling client {}: {} ({} connections remaining)",
                            peer_addr, e, remaining
                        );
                    }
                });
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                eprintln!("! Error accepting connection: {}", e);
            }
        }
    }

    println!("> Server stopped");
    Ok(())
}

/// Run the prompt on the local terminal instead of a socket.
fn run_console(config: &ShellConfig) -> ShellResult<()> {
    let mut line_buf = vec![0u8; config.shell.line_buffer_size.max(2)];
    let mut history_buf = vec![0u8; config.shell.history_buffer_size];

    let mut pool: PromptPool<'_, 1> = PromptPool::new();
    let handle = pool.acquire().ok_or(ShellError::PoolExhausted)?;
    let prompt: &mut Prompt<'_> = pool.get_mut(handle);
    prompt.set_line_buffer(&mut line_buf);
    if !history_buf.is_empty() {
        prompt.set_history_buffer(&mut history_buf);
    }
    prompt.set_prompt(&config.shell.prompt);

    let mut io = ConsoleTransport::new()?;
    io.write_str("Type Help for the command list\r\n");
    prompt.draw_prompt(&mut io);

    while !commands::shutdown_requested() && !commands::close_requested() && !io.interrupted() {
        prompt.run_cmd_prompt(&mut io, commands::COMMANDS);
        if !io.byte_available() {
            thread::sleep(Duration::from_millis(2));
        }
    }
    io.write_str("\r\n");

    Ok(())
}

/// Show server startup information in the console log
fn print_startup_banner(config: &ShellConfig) {
    println!();
    println!("*  {}  *", config.info.name);
    println!();
    println!("Operator: {}", config.info.operator);
    if config.server.enabled {
        println!("Mode:     Telnet server");
        println!("  Bind address:    {}", config.server.bind_address);
        println!("  Telnet port:     {}", config.server.telnet_port);
        println!("  Max connections: {}", config.server.max_connections);
    } else {
        println!("Mode:     Local console");
    }
    println!(
        "Buffers:  line {} bytes, history {} bytes",
        config.shell.line_buffer_size, config.shell.history_buffer_size
    );
    println!();
}

/// Notify a client that the connection limit has been reached
fn show_rejection(mut stream: TcpStream) -> ShellResult<()> {
    use std::io::Write;

    stream.write_all(
        b"Sorry, the shell has reached its maximum number of concurrent connections. Please try again later.\r\n",
    )?;
    stream.flush()?;
    thread::sleep(Duration::from_secs(1));
    Ok(())
}
