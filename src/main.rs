use colored::Colorize;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let command_line_interface = sparkddl::cli::CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("{}", format!("error: {error:#}").red());
        std::process::exit(1);
    }
}
