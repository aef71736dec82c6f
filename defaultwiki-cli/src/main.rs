use clap::Command;

mod cmd;
mod config;

fn cli() -> Command {
    Command::new("defaultwiki")
        .about("A small personal wiki")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(cmd::serve::make_subcommand())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("serve", args)) => cmd::serve::execute(args).await,
        // No subcommand: serve with whatever the config file and env say
        _ => {
            let args = cmd::serve::make_subcommand().get_matches_from(["serve"]);
            cmd::serve::execute(&args).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        cli().debug_assert();
    }

    #[test]
    fn test_serve_flags_parse() {
        let matches = cli()
            .try_get_matches_from(["defaultwiki", "serve", "--port", "8080", "--open"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "serve");
        assert_eq!(args.get_one::<u16>("port"), Some(&8080));
        assert!(args.get_flag("open"));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let result = cli().try_get_matches_from(["defaultwiki", "serve", "--port", "http"]);
        assert!(result.is_err());
    }
}
