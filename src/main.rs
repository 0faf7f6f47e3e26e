fn main() {
    env_logger::builder()
        .parse_env(env_logger::Env::new().filter_or("PSTREE_LOG", "warn"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let res = pstree::app::run(&args, &mut std::io::stdout().lock(), &mut std::io::stderr());
    if let Err(err) = res {
        if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
