use std::{
    fs::File,
    io::{self, stdout},
    panic,
    sync::atomic::Ordering,
    time::{Duration, Instant},
};

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use cubo3d::{
    config::create_clap_command,
    input::{actions_from_minifb, key_from_crossterm, KeyBindings},
    pipeline::{FrameBuffer, Pipeline, TermBuffer},
    Config, DisplayTarget, Scene, DEBUG_PIPELINE,
};
use log::{error, info, warn};
use minifb::{Scale, Window, WindowOptions};
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

fn main() -> io::Result<()> {
    let matches = create_clap_command().get_matches();
    let config = Config::from_matches(&matches)?;

    init_logging(&config)?;
    DEBUG_PIPELINE.store(config.debug, Ordering::Relaxed);
    info!(
        "Starting cubo3d in {:?} mode, edge {} and redraw delay {:?}",
        config.target, config.edge_length, config.frame_delay
    );

    let result = match config.target {
        DisplayTarget::Window => run_win(&config),
        DisplayTarget::Terminal => run_term(&config),
    };
    if let Err(e) = &result {
        error!("Exiting with error: {}", e);
    }
    result
}

/// The terminal target owns stdout, so it only logs to file.
fn init_logging(config: &Config) -> io::Result<()> {
    let log_config = simplelog::Config::default();
    let file_logger = WriteLogger::new(
        config.log_level,
        log_config.clone(),
        File::create(&config.log_file)?,
    );

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![file_logger];
    if config.target == DisplayTarget::Window {
        loggers.push(TermLogger::new(
            config.log_level,
            log_config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn sleep_rest_of_frame(frame_start: Instant, frame_delay: Duration) {
    if let Some(rest) = frame_delay.checked_sub(frame_start.elapsed()) {
        std::thread::sleep(rest);
    }
}

pub fn run_win(config: &Config) -> io::Result<()> {
    let mut window = Window::new(
        &config.title,
        config.width,
        config.height,
        WindowOptions {
            resize: false,
            scale: Scale::X1,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let scene = Scene::from_config(config, config.width as f32 / config.height as f32);
    let bindings = KeyBindings::from_config(config);
    let mut pipeline = Pipeline::<FrameBuffer>::new(config.width, config.height, scene);
    info!("Window '{}' opened at {}x{}", config.title, config.width, config.height);

    let mut last_frame = Instant::now();
    'mainloop: while window.is_open() {
        let frame_start = Instant::now();

        for action in actions_from_minifb(&window, &bindings) {
            if action.apply(&mut pipeline.scene).is_break() {
                break 'mainloop;
            }
        }

        pipeline.render_frame(Some(&mut window))?;
        sleep_rest_of_frame(frame_start, config.frame_delay);

        let now = Instant::now();
        pipeline.update_metrics(now - last_frame);
        last_frame = now;
    }

    info!("Window closed");
    Ok(())
}

/// Restores the terminal however the render loop ends.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            if let Err(e) = cleanup_terminal() {
                eprintln!("Failed to cleanup terminal: {}", e);
            }
            error!("Panic occurred: {:?}", panic_info);
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            Hide,
            Clear(ClearType::All)
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

fn cleanup_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), Show, terminal::LeaveAlternateScreen)
}

fn term_aspect(width: u16, height: u16) -> f32 {
    width as f32 * CELL_ASPECT / height.max(1) as f32
}

pub fn run_term(config: &Config) -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;

    let (tw, th) = terminal::size()?;
    let scene = Scene::from_config(config, term_aspect(tw, th));
    let bindings = KeyBindings::from_config(config);
    let mut pipeline = Pipeline::<TermBuffer>::new(tw as usize, th as usize, scene);
    info!("Terminal renderer started at {}x{} cells", tw, th);

    let mut last_frame = Instant::now();
    'mainloop: loop {
        // Drain input until the next frame is due
        while event::poll(config.frame_delay.saturating_sub(last_frame.elapsed()))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    let action = key_from_crossterm(key.code).and_then(|k| bindings.action_for(k));
                    let Some(action) = action else {
                        continue;
                    };
                    if action.apply(&mut pipeline.scene).is_break() {
                        break 'mainloop;
                    }
                }
                Event::Resize(nw, nh) => {
                    pipeline.resize(nw as usize, nh as usize, term_aspect(nw, nh));
                }
                _ => {}
            }
        }

        pipeline.render_frame(None)?;

        let now = Instant::now();
        pipeline.update_metrics(now - last_frame);
        last_frame = now;
    }

    info!("Terminal renderer stopped");
    Ok(())
}
