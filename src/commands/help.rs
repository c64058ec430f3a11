//! Fixed usage texts.

/// Which usage block to print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    General,
    Show,
    Install,
    Update,
    Help,
}

impl HelpTopic {
    /// Topic for `help <command>`; unknown commands (and `list`) get the general usage.
    pub fn for_command(command: Option<&str>) -> Self {
        match command {
            Some("show") => HelpTopic::Show,
            Some("install") => HelpTopic::Install,
            Some("update") => HelpTopic::Update,
            Some("help") => HelpTopic::Help,
            _ => HelpTopic::General,
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            HelpTopic::General => GENERAL_USAGE,
            HelpTopic::Show => SHOW_USAGE,
            HelpTopic::Install => INSTALL_USAGE,
            HelpTopic::Update => UPDATE_USAGE,
            HelpTopic::Help => HELP_USAGE,
        }
    }
}

const GENERAL_USAGE: &str = "\
=======================================
         PHP Code Sniffer Tool

A management tool for PHP Code Sniffers
=======================================

Usage:
 phpcs-tool <command-name> [arguments]

Available commands:
 help      Displays help for a command
 install   Install code sniffer with a given code sniffer name
 update    Update code sniffer with a given code sniffer name
 list      List commands
 show      Show a list with available code sniffers";

const SHOW_USAGE: &str = "\
Usage:
 phpcs-tool show

Help:
 Show a list with available code sniffers";

const INSTALL_USAGE: &str = "\
Usage:
 phpcs-tool install <code-sniffer-name>

Help:
 Install code sniffer with a given code sniffer name (ex: symfony/Symfony2)";

const UPDATE_USAGE: &str = "\
Usage:
 phpcs-tool update <code-sniffer-name>

Help:
 Update code sniffer with a given code sniffer name (ex: symfony/Symfony2)";

const HELP_USAGE: &str = "\
Usage:
 phpcs-tool help <command-name>

Help:
 Displays help for a command";

/// Print the usage block for `topic`.
pub fn help(topic: HelpTopic) {
    println!("{}", topic.usage());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_for_command() {
        assert_eq!(HelpTopic::for_command(None), HelpTopic::General);
        assert_eq!(HelpTopic::for_command(Some("list")), HelpTopic::General);
        assert_eq!(HelpTopic::for_command(Some("bogus")), HelpTopic::General);
        assert_eq!(HelpTopic::for_command(Some("show")), HelpTopic::Show);
        assert_eq!(HelpTopic::for_command(Some("install")), HelpTopic::Install);
        assert_eq!(HelpTopic::for_command(Some("update")), HelpTopic::Update);
        assert_eq!(HelpTopic::for_command(Some("help")), HelpTopic::Help);
    }

    #[test]
    fn test_general_usage_lists_every_command() {
        let usage = HelpTopic::General.usage();
        for command in ["help", "install", "update", "list", "show"] {
            assert!(
                usage.contains(&format!("\n {:<10}", command)),
                "missing {} in general usage",
                command
            );
        }
    }

    #[test]
    fn test_install_usage() {
        let usage = HelpTopic::Install.usage();
        assert!(usage.starts_with("Usage:\n phpcs-tool install <code-sniffer-name>"));
        assert!(!usage.contains("Available commands"));
    }
}
