//! Headless runner
//!
//! ```text
//! ctrgpu-headless [settings.json] [frames] [out.png]
//! ```
//!
//! Boots a session, clears the top screen through memory fill engine 0, runs
//! the requested number of frames and optionally dumps the top screen as PNG.

use ctrgpu::gpu::registers::encode_address;
use ctrgpu::gpu::{
    reg_addr, Screen, FILL_24BIT, FILL_ADDRESS_END, FILL_ADDRESS_START, FILL_CONTROL,
    FILL_TRIGGER, FILL_VALUE, REG_MEMORY_FILL,
};
use ctrgpu::hooks::SwapCounter;
use ctrgpu::interrupt::{InterruptId, InterruptRecorder};
use ctrgpu::{Collaborators, Settings, System};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_FRAMES: u64 = 60;
const CLEAR_COLOR: u32 = 0x0040_2010;

struct Args {
    settings: Option<PathBuf>,
    frames: u64,
    output: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let settings = args.next().map(PathBuf::from);
    let frames = match args.next() {
        Some(n) => n
            .parse()
            .map_err(|e| format!("invalid frame count {:?}: {}", n, e))?,
        None => DEFAULT_FRAMES,
    };
    let output = args.next().map(PathBuf::from);
    Ok(Args {
        settings,
        frames,
        output,
    })
}

/// Fill the active top-screen buffer with a solid RGB8 color.
fn clear_top_screen(system: &mut System) -> ctrgpu::Result<()> {
    let fb = system.gpu.regs.framebuffer_config(Screen::Top);
    let start = fb.active_address(false);
    let end = start + fb.stride * fb.height();
    let base = REG_MEMORY_FILL[0];

    system.write_word(reg_addr(base + FILL_ADDRESS_START), encode_address(start))?;
    system.write_word(reg_addr(base + FILL_ADDRESS_END), encode_address(end))?;
    system.write_word(reg_addr(base + FILL_VALUE), CLEAR_COLOR)?;
    system.write_word(reg_addr(base + FILL_CONTROL), FILL_TRIGGER | FILL_24BIT)
}

fn run(args: Args) -> Result<(), String> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path).map_err(|e| e.to_string())?,
        None => Settings::default(),
    };

    let interrupts = InterruptRecorder::new();
    let swaps = SwapCounter::new();
    let hooks = Collaborators {
        interrupts: Box::new(interrupts.clone()),
        frames: Box::new(swaps.clone()),
        ..Default::default()
    };
    let mut system = System::init(settings, hooks);

    clear_top_screen(&mut system).map_err(|e| e.to_string())?;
    system.run_frames(args.frames);

    info!(
        "{} frames, {} swaps, {} PSC0, {} PDC0",
        system.gpu.timing.frame_count,
        swaps.count(),
        interrupts.count(InterruptId::Psc0),
        interrupts.count(InterruptId::Pdc0)
    );

    if let Some(path) = &args.output {
        let image = system
            .capture_framebuffer(Screen::Top)
            .map_err(|e| e.to_string())?;
        image
            .save_png(path)
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        info!("top screen written to {}", path.display());
    }

    system.shutdown();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let result = parse_args().and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("ctrgpu-headless: {}", e);
            ExitCode::FAILURE
        }
    }
}
