// SPDX-License-Identifier: MPL-2.0
use iced_reels::app::{self, Flags};
use iced_reels::i18n::fluent::I18n;
use iced_reels::logging;

fn main() -> iced::Result {
    logging::init();

    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        let lang = args.opt_value_from_str("--lang").unwrap_or(None);
        print_help(&I18n::new(lang, None));
        return Ok(());
    }

    let flags = Flags {
        lang: opt_value(&mut args, "--lang"),
        feed: opt_value(&mut args, "--feed"),
        config_dir: opt_value(&mut args, "--config-dir"),
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        tracing::warn!(?remaining, "ignoring unrecognized arguments");
    }

    app::run(flags)
}

fn opt_value(args: &mut pico_args::Arguments, key: &'static str) -> Option<String> {
    args.opt_value_from_str(key).unwrap_or_else(|err| {
        tracing::warn!(option = key, error = %err, "ignoring invalid option");
        None
    })
}

fn print_help(i18n: &I18n) {
    println!("{}", i18n.tr("help-usage"));
    println!();
    println!("{}", i18n.tr("help-options"));
    for key in ["help-lang", "help-feed", "help-config-dir", "help-help"] {
        println!("  {}", i18n.tr(key));
    }
    println!();
    println!("{}", i18n.tr("help-log"));
}
