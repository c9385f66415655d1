#![deny(clippy::all)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![deny(clippy::style)]
#![deny(clippy::print_stdout)]
#![deny(clippy::cast_lossless)]

use std::{
    fs,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, yield_now, JoinHandle},
};

use clap::Parser;
use color_eyre::Report;
use log::{error, info};
use parking_lot::RwLock;

use lightwash::config::LightwashConfig;
use lightwash::devices::manager::DeviceManager;
use lightwash::events::EventEmitter;
use lightwash::frame::FrameTimeKeeper;
use lightwash::frame_resolver::FrameResolver;
use lightwash::id::DeviceId;
use lightwash::presets::PresetStore;
use lightwash::rig::Rig;
use lightwash::state::{DeskState, ThreadedObject};

/// Two-zone DMX color wash controller.
#[derive(Parser)]
#[clap(name = "lightwash")]
struct Args {
    /// Engine config path; created with defaults when missing
    #[clap(long, default_value = "config.json")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    setup_logging()?;

    let args = Args::parse();

    if !Path::new(&args.config).exists() {
        let default_config = LightwashConfig::default();
        fs::write(&args.config, serde_json::to_string_pretty(&default_config)?)?;
        info!("Wrote default config to {}", args.config);
    }

    let config_json = fs::read_to_string(&args.config)?;
    let config: LightwashConfig = serde_json::from_str(&config_json)?;
    config.validate()?;

    let desk = Arc::new(RwLock::new(DeskState::new()));

    let preset_store = PresetStore::load(config.preset_file())?;
    if let Some(preset) = preset_store.first() {
        info!("Recalling preset \"{}\"", preset.name);
        desk.write().apply(preset.snapshot());
    }

    let rig = Rig::new(config.rig())?;
    info!(
        "Rig: {} fixtures over channels {}..={}",
        rig.segment_count(),
        config.rig().first_address,
        u32::from(config.rig().first_address) + config.rig().footprint() - 1
    );

    // Bounded so the resolver paces the clock
    let (tick_sender, tick_receiver) =
        crossbeam::channel::bounded(config.frame_buffer_size() as usize);

    let frame_time_keeper =
        FrameTimeKeeper::new(config.frame_rate(), u128::from(config.frame_buffer_size()));
    frame_time_keeper.send_frame_data_to("frame_resolver".to_string(), tick_sender);

    let frame_resolver = FrameResolver::new(Arc::clone(&desk), rig, tick_receiver);

    let mut device_manager = DeviceManager::new();
    device_manager.listen_to_resolved_frames(frame_resolver.subscribe());
    for startup_device in config.devices() {
        info!("Adding output device {}", startup_device.id);
        device_manager.add_device_from_config(
            DeviceId::new_from(startup_device.id.clone()),
            startup_device.config.clone(),
        );
    }
    let device_manager = Arc::new(RwLock::new(device_manager));

    let device_manager_threaded: Arc<RwLock<dyn ThreadedObject>> = device_manager.clone();
    let threaded_objects: Vec<Arc<RwLock<dyn ThreadedObject>>> = vec![
        Arc::new(RwLock::new(frame_time_keeper)),
        Arc::new(RwLock::new(frame_resolver)),
        device_manager_threaded,
    ];

    let running = Arc::new(AtomicBool::new(true));
    let mut handles: Vec<JoinHandle<()>> = vec![];

    for obj in threaded_objects {
        let alive = Arc::clone(&running);
        let handle = thread::spawn(move || {
            while alive.load(Ordering::SeqCst) {
                obj.write().run();

                yield_now();
            }
        });
        handles.push(handle);
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    running.store(false, Ordering::SeqCst);
    for handle in handles {
        if handle.join().is_err() {
            error!("A worker thread panicked during shutdown");
        }
    }
    device_manager.read().stop_all();

    preset_store.save()?;
    info!("Presets saved to {}", preset_store.path().display());

    Ok(())
}

fn setup_logging() -> Result<(), Report> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }
    color_eyre::install()?;

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "lightwash=info");
    }
    env_logger::init();

    Ok(())
}
