//! Layerbox demo
//!
//! Loads an Ogmo level (or generates a seeded one), registers its merged
//! tile hitboxes and drops a player box onto the floor.
//!
//! Usage: `layerbox [LEVEL.json] [--seed N] [--no-merge]`

use std::env;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use layerbox::consts::HITBOX_LAYER_NAME;
use layerbox::tilemap::{HitboxTemplate, LevelFile, LevelLayer, TileMap, TileSet};
use layerbox::{CollisionSettings, CollisionWorld, Hitbox, Side, Space, SpaceStore, Vector};

const CELL: u32 = 16;
const DEMO_COLS: u32 = 20;
const DEMO_ROWS: u32 = 11;
const FALL_STEP: f32 = 2.0;
const MAX_STEPS: u32 = 200;

struct Options {
    level: Option<String>,
    seed: u64,
    merge: bool,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        level: None,
        seed: 42,
        merge: true,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                options.seed = value
                    .parse()
                    .map_err(|_| format!("invalid seed: {}", value))?;
            }
            "--no-merge" => options.merge = false,
            _ if arg.starts_with("--") => return Err(format!("unknown flag: {}", arg)),
            _ => options.level = Some(arg),
        }
    }
    Ok(options)
}

/// Level with a solid floor and a few random platforms, some of them spiked
fn generate_level(seed: u64) -> LevelFile {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut cells = vec!['0'; (DEMO_COLS * DEMO_ROWS) as usize];
    let index = |x: u32, y: u32| (y * DEMO_COLS + x) as usize;

    for x in 0..DEMO_COLS {
        cells[index(x, DEMO_ROWS - 1)] = '1';
    }
    for y in (2..DEMO_ROWS - 2).step_by(3) {
        let len = rng.random_range(3..8);
        let start = rng.random_range(0..DEMO_COLS - len);
        let kind = if rng.random_bool(0.25) { '2' } else { '1' };
        for x in start..start + len {
            cells[index(x, y)] = kind;
        }
    }

    let layer = |name: &str| LevelLayer {
        name: name.to_string(),
        offset_x: 0,
        offset_y: 0,
        grid_cell_width: CELL,
        grid_cell_height: CELL,
        grid_cells_x: DEMO_COLS,
        grid_cells_y: DEMO_ROWS,
        tileset: String::new(),
        data: Vec::new(),
        grid: Vec::new(),
    };
    let mut ground = layer("ground");
    ground.data = cells
        .iter()
        .map(|&c| if c == '0' { -1 } else { c as i32 - '1' as i32 })
        .collect();
    let mut hitboxes = layer(HITBOX_LAYER_NAME);
    hitboxes.grid = cells.iter().map(|c| c.to_string()).collect();

    LevelFile {
        ogmo_version: "3.4.0".to_string(),
        width: DEMO_COLS * CELL,
        height: DEMO_ROWS * CELL,
        offset_x: 0,
        offset_y: 0,
        layers: vec![ground, hitboxes],
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let options = parse_args()?;
    let settings = CollisionSettings {
        merge_tile_hitboxes: options.merge,
        ..CollisionSettings::load_or_default("layerbox.json")
    };

    let level = match &options.level {
        Some(path) => LevelFile::open(path)?,
        None => {
            log::info!("Generating level with seed {}", options.seed);
            generate_level(options.seed)
        }
    };

    let tile = Vector::splat(CELL as f32);
    let templates = [
        HitboxTemplate::new(tile).with_tag("solid"),
        HitboxTemplate::new(tile).with_tag("spike"),
    ];
    let tileset = TileSet::new(glam::UVec2::new(CELL * 4, CELL), glam::UVec2::splat(CELL));
    let map = TileMap::new(level, tileset, &templates, &settings)?;

    let mut spaces = SpaceStore::with_key();
    let mut world = CollisionWorld::from_settings(&settings);
    let map_space = spaces.insert(map.space());
    map.spawn_hitboxes(&mut world, &spaces, map_space)?;
    println!(
        "{} tile cells -> {} hitboxes ({} drawable tiles)",
        map.grid().occupied_count(),
        map.hitboxes().len(),
        map.tiles().count()
    );

    let mut rng = Pcg32::seed_from_u64(options.seed ^ 0x5eed);
    let half_width = (map.map_size().x / 2.0 - CELL as f32).max(1.0);
    let start = Vector::new(
        rng.random_range(-half_width..half_width),
        map.map_size().y / 2.0,
    );
    let player_space = spaces.insert(Space::new(start, Vector::splat(12.0)));
    let player = world.spawn(&spaces, Hitbox::rectangle(player_space).with_tag("player"))?;

    for step in 0..MAX_STEPS {
        if world.check(&spaces, player, Some("spike"))? {
            println!("Step {}: hit spikes at {:?}", step, spaces[player_space].position);
            return Ok(());
        }
        let (hits, side) = world.advanced_check(&spaces, player, Some("solid"))?;
        if side == Side::Down {
            println!(
                "Step {}: landed at {:?} touching {} hitbox(es)",
                step,
                spaces[player_space].position,
                hits.len()
            );
            return Ok(());
        }
        spaces[player_space].position.y -= FALL_STEP;
    }
    println!("Player fell through the level");
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Layerbox demo starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("layerbox: {}", e);
        std::process::exit(1);
    }
}
