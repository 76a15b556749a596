use gol_hashlife::Simulation;
use gol_hashlife::WorldOffset;
use tracing_subscriber::EnvFilter;

// .O.
// ..O
// OOO
const GLIDER: [(WorldOffset, WorldOffset); 5] = [(1, 0), (2, -1), (0, -2), (1, -2), (2, -2)];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut sim = Simulation::try_new(6)?;

    for (x, y) in GLIDER {
        sim.try_set(x, y)?;
    }

    for exp in -1..=3 {
        let mut cells = sim.get(exp);
        cells.sort();

        let generation = if exp < 0 { 0 } else { 1 << exp };
        println!("generation {generation:>2}: {cells:?}");
    }

    println!("{} nodes in the library", sim.library().size());

    Ok(())
}
