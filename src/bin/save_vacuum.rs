use pzkit::{cli, logging, vacuum};

fn main() -> anyhow::Result<()> {
    let args = cli::parse_vacuum();
    logging::init(args.verbosity);
    vacuum::run(&args)?;
    Ok(())
}
