mod command;
mod decode;
mod interpreter;
mod record;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
