//! Builtin command table.

/// Commands understood by the interpreter when no file in the working directory matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// List every builtin.
    Help,
    /// Print or change the working directory.
    Cd,
    /// List the working directory.
    Dir,
    /// Clear the transcript.
    Cls,
    /// Print the signed-in account.
    Whoami,
    /// Print the machine name.
    Hostname,
    /// Print the OS version.
    Ver,
    /// Print the argument text.
    Echo,
    /// Print system details.
    Systeminfo,
    /// Print the current date.
    Date,
    /// Print the current time.
    Time,
    /// Halt until a keypress.
    Pause,
    /// End the desktop session.
    Logoff,
    /// Create a folder.
    Mkdir,
    /// Print network configuration.
    Ipconfig,
    /// Change the text colour.
    Color,
    /// Simulate an echo request.
    Ping,
    /// Print a file.
    Type,
    /// Launch an application.
    Start,
    /// Close the terminal.
    Exit,
}

impl Builtin {
    /// Every builtin in help order.
    pub const ALL: [Self; 20] = [
        Self::Help,
        Self::Cd,
        Self::Dir,
        Self::Type,
        Self::Cls,
        Self::Echo,
        Self::Mkdir,
        Self::Start,
        Self::Ping,
        Self::Ipconfig,
        Self::Color,
        Self::Date,
        Self::Time,
        Self::Systeminfo,
        Self::Hostname,
        Self::Ver,
        Self::Whoami,
        Self::Pause,
        Self::Logoff,
        Self::Exit,
    ];

    /// Primary command name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Cd => "cd",
            Self::Dir => "dir",
            Self::Cls => "cls",
            Self::Whoami => "whoami",
            Self::Hostname => "hostname",
            Self::Ver => "ver",
            Self::Echo => "echo",
            Self::Systeminfo => "systeminfo",
            Self::Date => "date",
            Self::Time => "time",
            Self::Pause => "pause",
            Self::Logoff => "logoff",
            Self::Mkdir => "mkdir",
            Self::Ipconfig => "ipconfig",
            Self::Color => "color",
            Self::Ping => "ping",
            Self::Type => "type",
            Self::Start => "start",
            Self::Exit => "exit",
        }
    }

    /// Alternate names.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Mkdir => &["md"],
            _ => &[],
        }
    }

    fn usage(self) -> &'static str {
        match self {
            Self::Cd => "CD [dir]",
            Self::Echo => "ECHO [text]",
            Self::Mkdir => "MKDIR [name]",
            Self::Color => "COLOR [attr]",
            Self::Ping => "PING [host]",
            Self::Type => "TYPE [file]",
            Self::Start => "START [target]",
            Self::Help => "HELP",
            Self::Dir => "DIR",
            Self::Cls => "CLS",
            Self::Whoami => "WHOAMI",
            Self::Hostname => "HOSTNAME",
            Self::Ver => "VER",
            Self::Systeminfo => "SYSTEMINFO",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Pause => "PAUSE",
            Self::Logoff => "LOGOFF",
            Self::Ipconfig => "IPCONFIG",
            Self::Exit => "EXIT",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            Self::Help => "Lists available commands.",
            Self::Cd => "Changes current directory (Documents, Desktop, Downloads).",
            Self::Dir => "Lists files in current virtual directory.",
            Self::Type => "Displays file content.",
            Self::Cls => "Clears the screen.",
            Self::Echo => "Displays a message.",
            Self::Mkdir => "Creates a folder (alias MD).",
            Self::Start => "Opens an application or web address.",
            Self::Ping => "Sends echo requests to a host.",
            Self::Ipconfig => "Displays network configuration.",
            Self::Color => "Sets the text color (0-9, A-F).",
            Self::Date => "Displays the current date.",
            Self::Time => "Displays the current time.",
            Self::Systeminfo => "Displays system information.",
            Self::Hostname => "Displays the computer name.",
            Self::Ver => "Displays Windows version.",
            Self::Whoami => "Displays current user.",
            Self::Pause => "Suspends processing of a batch file.",
            Self::Logoff => "Signs out of the current session.",
            Self::Exit => "Closes the terminal window.",
        }
    }

    /// Help line with the usage padded to a fixed column.
    pub fn help_line(self) -> String {
        format!("{:<15}{}", self.usage(), self.summary())
    }

    /// Resolves a command token case-insensitively, including aliases.
    pub fn lookup(token: &str) -> Option<Self> {
        let token = token.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|builtin| builtin.name() == token || builtin.aliases().contains(&token.as_str()))
    }
}

/// Help text enumerating every builtin.
pub fn help_lines() -> Vec<String> {
    Builtin::ALL.into_iter().map(Builtin::help_line).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_knows_aliases() {
        assert_eq!(Builtin::lookup("DIR"), Some(Builtin::Dir));
        assert_eq!(Builtin::lookup("md"), Some(Builtin::Mkdir));
        assert_eq!(Builtin::lookup("Md"), Some(Builtin::Mkdir));
        assert_eq!(Builtin::lookup("format"), None);
    }

    #[test]
    fn help_lists_every_builtin_once_in_aligned_columns() {
        let lines = help_lines();
        assert_eq!(lines.len(), Builtin::ALL.len());
        assert_eq!(
            lines[1],
            "CD [dir]       Changes current directory (Documents, Desktop, Downloads)."
        );
        assert!(lines.iter().all(|line| line.len() > 15 && line.as_bytes()[14] == b' '));
    }
}
