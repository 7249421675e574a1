use std::{error::Error, fs, path::Path};

use gridmdp::{
    algo::{PolicyIteration, PolicyIterationConfig, ValueIteration},
    grid::{maps, Cell, GridConfig, GridWorld},
    walker::Walker,
    Solution,
};

const MAX_STEPS: u32 = 50;

fn render(grid: &GridWorld, solution: &Solution) -> String {
    let mut out = String::new();
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let pos = (row, col);
            let glyph = match (grid.cell(pos), solution.policy.get(pos)) {
                (Cell::Wall, _) => '#',
                (_, Some(action)) => action.arrow(),
                (_, None) => '.',
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn run(name: &str, config: GridConfig, out: &Path) -> Result<(), Box<dyn Error>> {
    let grid = config.build()?;

    let solutions = [
        ("value_iteration", ValueIteration::default().solve(&grid)),
        (
            "policy_iteration",
            PolicyIteration::new(PolicyIterationConfig {
                seed: Some(0),
                ..Default::default()
            })
            .solve(&grid),
        ),
    ];

    for (solver, solution) in &solutions {
        println!("{} / {}: {} iterations", name, solver, solution.iterations);
        println!("{}", render(&grid, solution));

        let mut walker = Walker::new(&grid);
        while walker.steps() < MAX_STEPS && walker.follow(&solution.policy).is_some() {}
        println!(
            "Walked {} steps from {:?} to {:?}, collecting {:.2}\n",
            walker.steps(),
            grid.start(),
            walker.pos(),
            walker.total_reward()
        );

        let mut wtr = csv::Writer::from_path(out.join(format!("{}_{}.csv", name, solver)))?;
        for (row, values) in solution.utilities.rows().enumerate() {
            let record = values
                .iter()
                .enumerate()
                .map(|(col, value)| {
                    if grid.is_wall((row, col)) {
                        String::from("wall")
                    } else {
                        format!("{:.4}", value)
                    }
                })
                .collect::<Vec<_>>();
            wtr.write_record(record)?;
        }
        wtr.flush()?;
    }

    let diff = solutions[0].1.utilities.max_diff(&solutions[1].1.utilities, &grid);
    println!("{}: largest utility gap between solvers {:.4}\n", name, diff);

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let out = Path::new("demos/grid_world/out");
    fs::create_dir_all(out)?;

    run("small", maps::small(), out)?;
    run("large", maps::large(), out)?;

    Ok(())
}
