//! Single-line command evaluation.
//!
//! [`execute`] is pure: it reads the file store and context, and returns printed lines plus
//! effect intents. Precedence is fixed: blank lines and `@echo off` are silent, then a file in the
//! working directory named by the first token, then the builtin table, then the
//! "not recognized" fallback.

use chrono::NaiveDateTime;
use platform_host::{FileKind, ParentFolder, RootFolder, VirtualFile, VirtualFileStore};
use system_shell_contract::{
    CommandOutcome, LaunchRequest, PendingLine, ShellEffect, DEFAULT_TEXT_COLOR,
};

use crate::builtins::{help_lines, Builtin};

/// Machine name reported by `hostname` and `systeminfo`.
pub const HOST_NAME: &str = "WIN-SIM-PRO";
/// Version string printed by `ver`.
pub const VERSION_LINE: &str = "Microsoft Windows [Version 11.0.22621]";
/// Prompt printed by `pause`.
pub const PAUSE_PROMPT: &str = "Press any key to continue . . . ";
/// Target of `ping` without an argument.
pub const DEFAULT_PING_HOST: &str = "127.0.0.1";

const NOT_FOUND_PATH: &str = "The system cannot find the path specified.";
const NOT_FOUND_FILE: &str = "The system cannot find the file specified.";
const SYNTAX_ERROR: &str = "The syntax of the command is incorrect.";
const LISTING_STAMP: &str = "05/23/2024  02:00 PM";
const FREE_SPACE_FOOTER: &str = "               0 Dir(s)  128,849,018,880 bytes free";

/// Inputs visible to a command.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Signed-in account name.
    pub user_name: &'a str,
    /// Working directory; a root or a folder opened from Explorer.
    pub cwd: &'a ParentFolder,
    /// Root shown in paths and prompts.
    pub root: RootFolder,
    /// Snapshot of the shared file store.
    pub files: &'a VirtualFileStore,
    /// Wall clock used by `date` and `time`.
    pub now: NaiveDateTime,
    /// Delay carried by the `logoff` effect.
    pub logoff_delay_ms: u64,
}

impl<'a> CommandContext<'a> {
    /// Full path of the working directory.
    pub fn cwd_path(&self) -> String {
        directory_path(self.user_name, self.root)
    }

    fn runnable_file(&self, token: &str) -> Option<&'a VirtualFile> {
        let cwd = self.cwd;
        self.files
            .entries()
            .iter()
            .find(|file| &file.parent == cwd && !file.is_folder() && file.matches_token(token))
    }
}

/// Windows-style path of a user's root folder.
pub fn directory_path(user_name: &str, cwd: RootFolder) -> String {
    format!("C:\\Users\\{user_name}\\{}", cwd.label())
}

/// Evaluates one command line.
pub fn execute(line: &str, ctx: &CommandContext<'_>) -> CommandOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.to_ascii_lowercase().starts_with("@echo off") {
        return CommandOutcome::silent();
    }

    let (token, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    if let Some(file) = ctx.runnable_file(token) {
        return run_file(file);
    }

    match Builtin::lookup(token) {
        Some(builtin) => run_builtin(builtin, rest, ctx),
        None => not_recognized(token),
    }
}

fn run_file(file: &VirtualFile) -> CommandOutcome {
    if file.kind == FileKind::Batch {
        return CommandOutcome::line(format!(
            "Starting nested batch execution for {}...",
            file.name
        ))
        .with_effect(ShellEffect::EnqueueFront {
            lines: PendingLine::commands(file.lines()),
        });
    }

    CommandOutcome::lines([
        format!("Contents of {}:", file.file_name()),
        "--------------------".to_string(),
        file.content.clone(),
    ])
}

fn not_recognized(token: &str) -> CommandOutcome {
    CommandOutcome::lines([
        format!(
            "'{}' is not recognized as an internal or external command,",
            token.to_lowercase()
        ),
        "operable program or batch file.".to_string(),
    ])
}

fn run_builtin(builtin: Builtin, rest: &str, ctx: &CommandContext<'_>) -> CommandOutcome {
    let arg = rest.trim();
    match builtin {
        Builtin::Help => CommandOutcome::lines(help_lines()),
        Builtin::Cd => change_directory(arg, ctx),
        Builtin::Dir => CommandOutcome::lines(directory_listing(ctx)),
        Builtin::Cls => CommandOutcome::silent().with_effect(ShellEffect::ClearTranscript),
        Builtin::Whoami => {
            CommandOutcome::line(format!("win-sim\\{}", ctx.user_name.to_lowercase()))
        }
        Builtin::Hostname => CommandOutcome::line(HOST_NAME),
        Builtin::Ver => CommandOutcome::line(VERSION_LINE),
        Builtin::Echo => CommandOutcome::line(rest),
        Builtin::Systeminfo => CommandOutcome::lines([
            format!("Host Name: {HOST_NAME}"),
            "OS Name: Microsoft Windows 11 Pro".to_string(),
            format!("Registered Owner: {}", ctx.user_name),
        ]),
        Builtin::Date => CommandOutcome::line(ctx.now.format("%A, %B %-d, %Y").to_string()),
        Builtin::Time => CommandOutcome::line(ctx.now.format("%-I:%M:%S %p").to_string()),
        Builtin::Pause => CommandOutcome::line(PAUSE_PROMPT).halting(),
        Builtin::Logoff => {
            CommandOutcome::line("Logging off...").with_effect(ShellEffect::ScheduleLogOff {
                delay_ms: ctx.logoff_delay_ms,
            })
        }
        Builtin::Mkdir => {
            if arg.is_empty() {
                CommandOutcome::line(SYNTAX_ERROR)
            } else {
                CommandOutcome::silent().with_effect(ShellEffect::CreateFolder {
                    name: arg.to_string(),
                })
            }
        }
        Builtin::Ipconfig => CommandOutcome::lines(IPCONFIG_BLOCK),
        Builtin::Color => set_color(arg),
        Builtin::Ping => ping(arg),
        Builtin::Type => type_file(arg, ctx),
        Builtin::Start => start(arg),
        Builtin::Exit => CommandOutcome::silent().with_effect(ShellEffect::CloseWindow),
    }
}

fn change_directory(arg: &str, ctx: &CommandContext<'_>) -> CommandOutcome {
    if arg.is_empty() {
        return CommandOutcome::line(ctx.cwd_path());
    }
    match RootFolder::from_token(arg) {
        Some(root) => CommandOutcome::silent().with_effect(ShellEffect::ChangeDirectory { root }),
        None => CommandOutcome::line(NOT_FOUND_PATH),
    }
}

fn directory_listing(ctx: &CommandContext<'_>) -> Vec<String> {
    let entries: Vec<&VirtualFile> = ctx.files.children(ctx.cwd).collect();

    let mut lines = vec![format!(" Directory of {}", ctx.cwd_path()), String::new()];
    lines.extend(entries.iter().map(|file| {
        let tag = match file.kind {
            FileKind::Batch => "<BAT>",
            FileKind::Folder => "<DIR>",
            FileKind::File => "     ",
        };
        format!("{LISTING_STAMP}    {tag}          {}", file.file_name())
    }));
    lines.push(format!(
        "               {} File(s)            0 bytes",
        entries.len()
    ));
    lines.push(FREE_SPACE_FOOTER.to_string());
    lines
}

const IPCONFIG_BLOCK: [&str; 8] = [
    "Windows IP Configuration",
    "",
    "Ethernet adapter Ethernet:",
    "",
    "   Connection-specific DNS Suffix  . : localdomain",
    "   IPv4 Address. . . . . . . . . . . : 192.168.1.105",
    "   Subnet Mask . . . . . . . . . . . : 255.255.255.0",
    "   Default Gateway . . . . . . . . . : 192.168.1.1",
];

/// Maps a colour attribute digit to its CSS colour.
pub fn color_for_digit(digit: char) -> Option<&'static str> {
    let color = match digit.to_ascii_lowercase() {
        '0' => "#0c0c0c",
        '1' => "#0037da",
        '2' => "#13a10e",
        '3' => "#3a96dd",
        '4' => "#c50f1f",
        '5' => "#881798",
        '6' => "#c19c00",
        '7' => "#cccccc",
        '8' => "#767676",
        '9' => "#3b78ff",
        'a' => "#16c60c",
        'b' => "#61d6d6",
        'c' => "#e74856",
        'd' => "#b4009e",
        'e' => "#f9f1a5",
        'f' => "#f2f2f2",
        _ => return None,
    };
    Some(color)
}

fn set_color(arg: &str) -> CommandOutcome {
    if arg.is_empty() {
        return CommandOutcome::silent().with_effect(ShellEffect::SetTextColor {
            color: DEFAULT_TEXT_COLOR.to_string(),
        });
    }
    match arg.chars().last().and_then(color_for_digit) {
        Some(color) => CommandOutcome::silent().with_effect(ShellEffect::SetTextColor {
            color: color.to_string(),
        }),
        None => CommandOutcome::silent(),
    }
}

fn ping(arg: &str) -> CommandOutcome {
    let host = arg.split_whitespace().next().unwrap_or(DEFAULT_PING_HOST);
    let mut queued: Vec<PendingLine> = (0..4)
        .map(|_| {
            PendingLine::Output(format!("Reply from {host}: bytes=32 time<1ms TTL=128"))
        })
        .collect();
    queued.push(PendingLine::Output(format!("Ping statistics for {host}:")));
    queued.push(PendingLine::Output(
        "    Packets: Sent = 4, Received = 4, Lost = 0 (0% loss),".to_string(),
    ));

    CommandOutcome::line(format!("Pinging {host} with 32 bytes of data:"))
        .with_effect(ShellEffect::EnqueueFront { lines: queued })
}

fn type_file(arg: &str, ctx: &CommandContext<'_>) -> CommandOutcome {
    if arg.is_empty() {
        return CommandOutcome::line(SYNTAX_ERROR);
    }
    match ctx.runnable_file(arg) {
        Some(file) => CommandOutcome::lines(file.lines()),
        None => CommandOutcome::line(NOT_FOUND_FILE),
    }
}

/// Maps a `start` alias to an application id; unknown names pass through lower-cased.
pub fn start_target(token: &str) -> String {
    let token = token.to_lowercase();
    let mapped = match token.as_str() {
        "calc" => "calculator",
        "winword" => "word",
        "edge" | "chrome" | "browser" => "browser",
        "cmd" => "terminal",
        "taskmgr" => "taskmanager",
        other => other,
    };
    mapped.to_string()
}

fn start(arg: &str) -> CommandOutcome {
    let Some(target) = arg.split_whitespace().next() else {
        return CommandOutcome::silent().with_effect(ShellEffect::OpenApp {
            request: LaunchRequest::app("terminal"),
        });
    };
    let request = if target.to_ascii_lowercase().starts_with("http") {
        LaunchRequest::browser(target)
    } else {
        LaunchRequest::app(start_target(target))
    };
    CommandOutcome::silent().with_effect(ShellEffect::OpenApp { request })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use platform_host::FileDraft;
    use pretty_assertions::assert_eq;

    use super::*;

    fn clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 23)
            .and_then(|date| date.and_hms_opt(14, 5, 9))
            .expect("valid timestamp")
    }

    fn run(line: &str, files: &VirtualFileStore, cwd: RootFolder) -> CommandOutcome {
        execute(
            line,
            &CommandContext {
                user_name: "Alice",
                cwd: &ParentFolder::Root(cwd),
                root: cwd,
                files,
                now: clock(),
                logoff_delay_ms: 800,
            },
        )
    }

    fn run_in_documents(line: &str) -> CommandOutcome {
        run(line, &VirtualFileStore::seeded(), RootFolder::Documents)
    }

    #[test]
    fn whoami_lowercases_the_account() {
        let outcome = run_in_documents("whoami");
        assert_eq!(outcome.output, vec!["win-sim\\alice".to_string()]);
        assert!(!outcome.halts_for_keypress);
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn blank_lines_and_echo_off_are_silent() {
        assert_eq!(run_in_documents("   "), CommandOutcome::silent());
        assert_eq!(run_in_documents("@echo off"), CommandOutcome::silent());
        assert_eq!(run_in_documents("@ECHO OFF"), CommandOutcome::silent());
    }

    #[test]
    fn pause_halts_with_a_single_prompt_line() {
        let outcome = run_in_documents("pause");
        assert_eq!(outcome.output, vec![PAUSE_PROMPT.to_string()]);
        assert!(outcome.halts_for_keypress);
    }

    #[test]
    fn unknown_command_prints_the_two_line_message() {
        let outcome = run_in_documents("Frobnicate now");
        assert_eq!(
            outcome.output,
            vec![
                "'frobnicate' is not recognized as an internal or external command,".to_string(),
                "operable program or batch file.".to_string(),
            ]
        );
    }

    #[test]
    fn echo_keeps_argument_text_verbatim() {
        assert_eq!(
            run_in_documents("echo Hello   World").output,
            vec!["Hello   World".to_string()]
        );
        assert_eq!(run_in_documents("echo").output, vec![String::new()]);
    }

    #[test]
    fn cd_prints_switches_or_rejects() {
        assert_eq!(
            run_in_documents("cd").output,
            vec!["C:\\Users\\Alice\\Documents".to_string()]
        );
        assert_eq!(
            run_in_documents("cd DESKTOP").effects,
            vec![ShellEffect::ChangeDirectory {
                root: RootFolder::Desktop
            }]
        );
        assert_eq!(
            run_in_documents("cd Music").output,
            vec![NOT_FOUND_PATH.to_string()]
        );
    }

    #[test]
    fn dir_in_empty_downloads_prints_only_header_and_footer() {
        let outcome = run("dir", &VirtualFileStore::seeded(), RootFolder::Downloads);
        assert_eq!(
            outcome.output,
            vec![
                " Directory of C:\\Users\\Alice\\Downloads".to_string(),
                String::new(),
                "               0 File(s)            0 bytes".to_string(),
                FREE_SPACE_FOOTER.to_string(),
            ]
        );
    }

    #[test]
    fn dir_tags_batch_files_and_folders() {
        let mut files = VirtualFileStore::seeded();
        files.save(FileDraft::text("build", "bat", RootFolder::Documents, "echo hi"));
        files
            .create_folder("Projects", ParentFolder::Root(RootFolder::Documents))
            .expect("folder");

        let outcome = run("dir", &files, RootFolder::Documents);
        assert_eq!(
            &outcome.output[2..5],
            &[
                "05/23/2024  02:00 PM                   readme.txt".to_string(),
                "05/23/2024  02:00 PM    <BAT>          build.bat".to_string(),
                "05/23/2024  02:00 PM    <DIR>          Projects".to_string(),
            ]
        );
        assert_eq!(
            outcome.output[5],
            "               3 File(s)            0 bytes"
        );
    }

    #[test]
    fn file_name_takes_precedence_over_builtins() {
        let mut files = VirtualFileStore::new();
        files.save(FileDraft::text("help", "txt", RootFolder::Desktop, "not the help"));

        let outcome = run("help", &files, RootFolder::Desktop);
        assert_eq!(
            outcome.output,
            vec![
                "Contents of help.txt:".to_string(),
                "--------------------".to_string(),
                "not the help".to_string(),
            ]
        );
        assert_eq!(
            run("help", &files, RootFolder::Documents).output.len(),
            Builtin::ALL.len()
        );
    }

    #[test]
    fn batch_file_expands_into_front_of_queue() {
        let mut files = VirtualFileStore::new();
        files.save(FileDraft::text(
            "inner",
            "bat",
            RootFolder::Documents,
            "echo mid\r\necho again",
        ));

        let outcome = run("inner.bat", &files, RootFolder::Documents);
        assert_eq!(
            outcome.output,
            vec!["Starting nested batch execution for inner...".to_string()]
        );
        assert_eq!(
            outcome.effects,
            vec![ShellEffect::EnqueueFront {
                lines: vec![
                    PendingLine::Command("echo mid".to_string()),
                    PendingLine::Command("echo again".to_string()),
                ],
            }]
        );
    }

    #[test]
    fn type_prints_lines_or_reports_missing_file() {
        let mut files = VirtualFileStore::new();
        files.save(FileDraft::text("notes", "txt", RootFolder::Documents, "a\nb"));

        assert_eq!(
            run("type notes", &files, RootFolder::Documents).output,
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(
            run("type ghost.txt", &files, RootFolder::Documents).output,
            vec![NOT_FOUND_FILE.to_string()]
        );
    }

    #[test]
    fn ping_prints_header_and_queues_paced_replies() {
        let outcome = run_in_documents("ping example.com");
        assert_eq!(
            outcome.output,
            vec!["Pinging example.com with 32 bytes of data:".to_string()]
        );
        let [ShellEffect::EnqueueFront { lines }] = outcome.effects.as_slice() else {
            panic!("expected a single enqueue effect");
        };
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            PendingLine::Output("Reply from example.com: bytes=32 time<1ms TTL=128".to_string())
        );
        assert_eq!(
            lines[4],
            PendingLine::Output("Ping statistics for example.com:".to_string())
        );

        let default_host = run_in_documents("ping");
        assert_eq!(
            default_host.output,
            vec!["Pinging 127.0.0.1 with 32 bytes of data:".to_string()]
        );
    }

    #[test]
    fn color_uses_last_digit_and_ignores_unknown() {
        assert_eq!(
            run_in_documents("color 0a").effects,
            vec![ShellEffect::SetTextColor {
                color: "#16c60c".to_string()
            }]
        );
        assert_eq!(run_in_documents("color zz"), CommandOutcome::silent());
        assert_eq!(
            run_in_documents("color").effects,
            vec![ShellEffect::SetTextColor {
                color: DEFAULT_TEXT_COLOR.to_string()
            }]
        );
    }

    #[test]
    fn start_maps_aliases_urls_and_raw_tokens() {
        let launch = |line: &str| match run_in_documents(line).effects.as_slice() {
            [ShellEffect::OpenApp { request }] => request.clone(),
            other => panic!("unexpected effects {other:?}"),
        };
        assert_eq!(launch("start"), LaunchRequest::app("terminal"));
        assert_eq!(launch("start calc"), LaunchRequest::app("calculator"));
        assert_eq!(launch("start WINWORD"), LaunchRequest::app("word"));
        assert_eq!(launch("start taskmgr"), LaunchRequest::app("taskmanager"));
        assert_eq!(
            launch("start https://example.com"),
            LaunchRequest::browser("https://example.com")
        );
        assert_eq!(launch("start paint"), LaunchRequest::app("paint"));
    }

    #[test]
    fn mkdir_logoff_and_exit_emit_effects() {
        assert_eq!(
            run_in_documents("md Reports").effects,
            vec![ShellEffect::CreateFolder {
                name: "Reports".to_string()
            }]
        );
        assert_eq!(
            run_in_documents("mkdir").output,
            vec![SYNTAX_ERROR.to_string()]
        );

        let logoff = run_in_documents("logoff");
        assert_eq!(logoff.output, vec!["Logging off...".to_string()]);
        assert_eq!(
            logoff.effects,
            vec![ShellEffect::ScheduleLogOff { delay_ms: 800 }]
        );
        assert_eq!(
            run_in_documents("exit").effects,
            vec![ShellEffect::CloseWindow]
        );
    }

    #[test]
    fn date_and_time_read_the_context_clock() {
        assert_eq!(
            run_in_documents("date").output,
            vec!["Thursday, May 23, 2024".to_string()]
        );
        assert_eq!(
            run_in_documents("time").output,
            vec!["2:05:09 PM".to_string()]
        );
    }

    #[test]
    fn fixed_system_commands() {
        assert_eq!(run_in_documents("hostname").output, vec![HOST_NAME.to_string()]);
        assert_eq!(run_in_documents("VER").output, vec![VERSION_LINE.to_string()]);
        assert_eq!(
            run_in_documents("systeminfo").output[2],
            "Registered Owner: Alice"
        );
        assert_eq!(run_in_documents("ipconfig").output.len(), IPCONFIG_BLOCK.len());
        assert_eq!(
            run_in_documents("cls").effects,
            vec![ShellEffect::ClearTranscript]
        );
    }
}
