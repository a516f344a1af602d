//! Command-line parsing for the `taskmate` binary.

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::validation::TaskForm;

pub const USAGE: &str = "usage: taskmate <command>

commands:
  login <email> <password>
  signup <user_name> <email> <password> <role>
  logout
  whoami
  tasks [--completed]
  students
  create <title> <description> <assignee_id> <deadline-rfc3339> [points]
  complete <task_id>
  delete <task_id>";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Login {
        email: String,
        password: String,
    },
    SignUp {
        user_name: String,
        email: String,
        password: String,
        role: String,
    },
    Logout,
    WhoAmI,
    Tasks {
        completed: bool,
    },
    Students,
    Create(TaskForm),
    Complete(i64),
    Delete(i64),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Login { .. } => "login",
            Command::SignUp { .. } => "signup",
            Command::Logout => "logout",
            Command::WhoAmI => "whoami",
            Command::Tasks { .. } => "tasks",
            Command::Students => "students",
            Command::Create(_) => "create",
            Command::Complete(_) => "complete",
            Command::Delete(_) => "delete",
        }
    }
}

/// Parses the arguments after the program name. Wrong arity or an unknown
/// command yields a validation error carrying [`USAGE`].
pub fn parse_command(args: &[String]) -> Result<Command, AppError> {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    let command = match (name.as_str(), rest) {
        ("help" | "--help" | "-h", []) => Command::Help,
        ("login", [email, password]) => Command::Login {
            email: email.clone(),
            password: password.clone(),
        },
        ("signup", [user_name, email, password, role]) => Command::SignUp {
            user_name: user_name.clone(),
            email: email.clone(),
            password: password.clone(),
            role: role.clone(),
        },
        ("logout", []) => Command::Logout,
        ("whoami", []) => Command::WhoAmI,
        ("tasks", []) => Command::Tasks { completed: false },
        ("tasks", [flag]) if flag == "--completed" => Command::Tasks { completed: true },
        ("students", []) => Command::Students,
        ("create", [title, description, assignee, deadline, points @ ..]) if points.len() <= 1 => {
            Command::Create(TaskForm {
                title: title.clone(),
                description: description.clone(),
                assignee_id: Some(parse_id(assignee)?),
                deadline: Some(parse_deadline(deadline)?),
                points: points.first().cloned().unwrap_or_default(),
            })
        }
        ("complete", [id]) => Command::Complete(parse_id(id)?),
        ("delete", [id]) => Command::Delete(parse_id(id)?),
        _ => return Err(usage()),
    };
    Ok(command)
}

fn usage() -> AppError {
    AppError::Validation(USAGE.to_string())
}

pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Not a valid id: {}", raw)))
}

pub fn parse_deadline(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation("Please set a deadline".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn is_usage(result: Result<Command, AppError>) -> bool {
        matches!(result, Err(AppError::Validation(msg)) if msg == USAGE)
    }

    #[test]
    fn create_with_and_without_points() {
        let deadline = Utc.with_ymd_and_hms(2030, 5, 1, 10, 0, 0).unwrap();

        let cmd = parse_command(&args(&["create", "Essay", "500 words", "7", "2030-05-01T12:00:00+02:00"]))
            .unwrap();
        assert_eq!(
            cmd,
            Command::Create(TaskForm {
                title: "Essay".to_string(),
                description: "500 words".to_string(),
                assignee_id: Some(7),
                deadline: Some(deadline),
                points: String::new(),
            })
        );

        let cmd = parse_command(&args(&["create", "Essay", "500 words", "7", "2030-05-01T10:00:00Z", "25"]))
            .unwrap();
        match cmd {
            Command::Create(form) => {
                assert_eq!(form.points, "25");
                assert_eq!(form.deadline, Some(deadline));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn create_arity_is_checked() {
        assert!(is_usage(parse_command(&args(&[
            "create", "Essay", "500 words", "7", "2030-05-01T10:00:00Z", "25", "extra"
        ]))));
        assert!(is_usage(parse_command(&args(&["create", "Essay", "500 words", "7"]))));
    }

    #[test]
    fn create_rejects_bad_assignee_and_deadline() {
        let err = parse_command(&args(&["create", "a", "b", "seven", "2030-05-01T10:00:00Z"])).unwrap_err();
        assert_eq!(err.user_message(), "Not a valid id: seven");

        let err = parse_command(&args(&["create", "a", "b", "7", "next friday"])).unwrap_err();
        assert_eq!(err.user_message(), "Please set a deadline");
    }

    #[test]
    fn tasks_flag() {
        assert_eq!(parse_command(&args(&["tasks"])).unwrap(), Command::Tasks { completed: false });
        assert_eq!(
            parse_command(&args(&["tasks", "--completed"])).unwrap(),
            Command::Tasks { completed: true }
        );
        assert!(is_usage(parse_command(&args(&["tasks", "--done"]))));
        assert!(is_usage(parse_command(&args(&["tasks", "--completed", "x"]))));
    }

    #[test]
    fn help_and_unknown_commands() {
        assert_eq!(parse_command(&[]).unwrap(), Command::Help);
        assert_eq!(parse_command(&args(&["-h"])).unwrap(), Command::Help);
        assert_eq!(parse_command(&args(&["--help"])).unwrap(), Command::Help);
        assert!(is_usage(parse_command(&args(&["publish"]))));
        assert!(is_usage(parse_command(&args(&["logout", "now"]))));
    }

    #[test]
    fn ids_are_trimmed_and_must_be_numeric() {
        assert_eq!(parse_command(&args(&["complete", " 12 "])).unwrap(), Command::Complete(12));
        assert_eq!(parse_command(&args(&["delete", "3"])).unwrap(), Command::Delete(3));
        let err = parse_command(&args(&["delete", "3a"])).unwrap_err();
        assert_eq!(err.user_message(), "Not a valid id: 3a");
    }

    #[test]
    fn account_commands_keep_their_arguments() {
        assert_eq!(
            parse_command(&args(&["signup", "Dan", "dan@school.test", "pw", "student"])).unwrap(),
            Command::SignUp {
                user_name: "Dan".to_string(),
                email: "dan@school.test".to_string(),
                password: "pw".to_string(),
                role: "student".to_string(),
            }
        );
        assert_eq!(
            parse_command(&args(&["login", "a@x.io", "secret"])).unwrap(),
            Command::Login {
                email: "a@x.io".to_string(),
                password: "secret".to_string(),
            }
        );
        assert!(is_usage(parse_command(&args(&["login", "a@x.io"]))));
    }
}
