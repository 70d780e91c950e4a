use click_demo_runner::prelude::*;

fn main() -> DemoResult<()> {
    let cli = init();

    run(cli.into())?;

    Ok(())
}
