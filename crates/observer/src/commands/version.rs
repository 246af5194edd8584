pub fn run() -> anyhow::Result<()> {
    println!("observer {}", env!("CARGO_PKG_VERSION"));
    println!("Session registry for speak-faster observer recordings");
    Ok(())
}
