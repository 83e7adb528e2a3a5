use crate::app::AppContext;
use crate::cli::{Notice, session, task};
use crate::domain::session::SessionService;
use crate::domain::task::{TaskId, TaskService};
use crate::dto::session::{LoginForm, SignupForm};
use crate::dto::task::TaskForm;
use crate::external_connections::ExternalConnectivity;
use crate::gateway::http_session_driven_ports::HttpSessionReader;
use crate::navigation::{self, Route, RouteDecision};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// One line typed into the shell
#[derive(Parser, Debug)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    #[command(flatten)]
    Session(SessionCommand),
    #[command(flatten)]
    Task(TaskCommand),
    /// Go to a page: /, /signup, /login or /tasks
    Route { path: String },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Create an account
    Signup {
        name: String,
        email: String,
        password: String,
    },
    /// Log in with your email and password
    Login { email: String, password: String },
    /// Show who is logged in
    Whoami,
    /// Log out
    Logout,
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Fetch and list your tasks
    Tasks,
    /// Create a task
    Add { name: String, description: String },
    /// Replace a task's name and description
    Edit {
        id: String,
        name: String,
        description: String,
        /// Mark the task as done
        #[arg(long)]
        done: bool,
    },
    /// Mark a task done, or not done again
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
}

/// What the shell should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    Continue(Notice),
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("missing closing {0} quote")]
pub struct UnbalancedQuote(char);

/// Splits a command line into words. Single or double quotes group words together.
pub fn split_words(line: &str) -> Result<Vec<String>, UnbalancedQuote> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if let Some(open) = quote {
        return Err(UnbalancedQuote(open));
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}

/// Interactive front end over an [AppContext]. Tracks which page the user is on so private
/// commands go through the same guard as the `/tasks` route.
pub struct Shell<C: ExternalConnectivity> {
    ctx: AppContext<C>,
    location: Route,
}

impl<C: ExternalConnectivity> Shell<C> {
    pub fn new(ctx: AppContext<C>) -> Self {
        Shell {
            ctx,
            location: Route::Landing,
        }
    }

    pub fn location(&self) -> Route {
        self.location
    }

    pub fn context(&self) -> &AppContext<C> {
        &self.ctx
    }

    /// Parses and runs a single command line
    pub async fn execute(&mut self, line: &str) -> Step {
        let words = match split_words(line) {
            Ok(words) => words,
            Err(err) => {
                return Step::Continue(Notice::error("Could not read command", err.to_string()));
            }
        };

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                return Step::Continue(Notice::success(
                    "Commands",
                    err.render().to_string().trim_end(),
                ));
            }
            Err(err) => {
                return Step::Continue(Notice::error(
                    "Unrecognized command",
                    err.render().to_string().trim_end(),
                ));
            }
        };
        debug!(command = ?parsed.command, "running command");

        let notice = match parsed.command {
            ShellCommand::Quit => return Step::Quit,
            ShellCommand::Route { path } => self.navigate(&path).await,
            ShellCommand::Session(command) => self.session_command(command).await,
            ShellCommand::Task(command) => self.task_command(command).await,
        };

        Step::Continue(notice)
    }

    /// Moves to [route] if the session allows it
    fn enter(&mut self, route: Route) -> Result<Route, Notice> {
        match navigation::resolve(route, &self.ctx.session.snapshot()) {
            RouteDecision::Render(route) => {
                self.location = route;
                Ok(route)
            }
            RouteDecision::Loading => Err(Notice::error(
                "Loading",
                "Still checking your session. Try again in a moment.",
            )),
            RouteDecision::Redirect(target) => {
                self.location = target;
                Err(Notice::error(
                    "Login required",
                    format!("Redirected to {target}. Log in to manage your tasks."),
                ))
            }
        }
    }

    async fn navigate(&mut self, path: &str) -> Notice {
        let route = match path.parse::<Route>() {
            Ok(route) => route,
            Err(err) => return Notice::error("Page not found", err.to_string()),
        };
        if let Err(notice) = self.enter(route) {
            return notice;
        }

        match route {
            Route::Landing => Notice::success(
                format!("Now at {route}"),
                "Manage your tasks from the terminal. Use `signup` or `login` to get started.",
            ),
            Route::Signup => Notice::success(
                format!("Now at {route}"),
                "Use `signup <name> <email> <password>` to create an account.",
            ),
            Route::Login => Notice::success(
                format!("Now at {route}"),
                "Use `login <email> <password>` to log in.",
            ),
            Route::Tasks => self.task_command(TaskCommand::Tasks).await,
        }
    }

    async fn session_command(&mut self, command: SessionCommand) -> Notice {
        let session_service = SessionService {};
        let ctx = &self.ctx;

        match command {
            SessionCommand::Signup {
                name,
                email,
                password,
            } => {
                let form = SignupForm {
                    name,
                    email,
                    password,
                };
                let notice = session::sign_up(form, &ctx.ext_cxn, &session_service).await;
                if !notice.is_error() {
                    self.location = Route::Login;
                }
                notice
            }
            SessionCommand::Login { email, password } => {
                let form = LoginForm { email, password };
                let notice =
                    session::log_in(form, &ctx.session, &ctx.ext_cxn, &session_service).await;
                if notice.is_error() {
                    return notice;
                }

                self.location = Route::Tasks;
                let listing = self.show_tasks().await;
                Notice {
                    description: format!("{}\n{listing}", notice.description),
                    ..notice
                }
            }
            SessionCommand::Whoami => session::who_am_i(&ctx.session),
            SessionCommand::Logout => {
                let notice =
                    session::log_out(&ctx.session, &ctx.tasks, &ctx.ext_cxn, &session_service)
                        .await;
                self.location = Route::Login;
                notice
            }
        }
    }

    /// Loads the backend's tasks into the store, the way the `/tasks` page does when it opens
    async fn show_tasks(&self) -> Notice {
        task::list_tasks(&self.ctx.tasks, &self.ctx.ext_cxn, &TaskService {}).await
    }

    async fn task_command(&mut self, command: TaskCommand) -> Notice {
        if let Err(notice) = self.enter(Route::Tasks) {
            return notice;
        }
        let task_service = TaskService {};
        let ctx = &self.ctx;

        match command {
            TaskCommand::Tasks => self.show_tasks().await,
            TaskCommand::Add { name, description } => {
                let form = TaskForm {
                    name,
                    description,
                    status: false,
                };
                task::add_task(form, &ctx.tasks, &ctx.ext_cxn, &task_service).await
            }
            TaskCommand::Edit {
                id,
                name,
                description,
                done,
            } => {
                let form = TaskForm {
                    name,
                    description,
                    status: done,
                };
                task::edit_task(
                    TaskId::from(id),
                    form,
                    &ctx.tasks,
                    &ctx.ext_cxn,
                    &task_service,
                )
                .await
            }
            TaskCommand::Toggle { id } => {
                task::toggle_task(TaskId::from(id), &ctx.tasks, &ctx.ext_cxn, &task_service).await
            }
            TaskCommand::Delete { id } => {
                task::delete_task(TaskId::from(id), &ctx.tasks, &ctx.ext_cxn, &task_service).await
            }
        }
    }
}

/// Resolves the session, then runs commands from [input] until it ends or the user quits.
/// Every command's notice is written to [output].
pub async fn run<C: ExternalConnectivity>(
    shell: &mut Shell<C>,
    input: impl AsyncBufRead + Unpin,
    mut output: impl AsyncWrite + Unpin,
) -> Result<(), std::io::Error> {
    let session = shell
        .ctx
        .session
        .initialize(&shell.ctx.ext_cxn, &HttpSessionReader)
        .await;
    if let Some(user) = session.user() {
        shell.location = Route::Tasks;
        output
            .write_all(format!("Welcome back, {}!\n", user.name).as_bytes())
            .await?;
        let listing = shell.show_tasks().await;
        output.write_all(format!("{listing}\n").as_bytes()).await?;
    }

    let mut lines = input.lines();
    loop {
        output
            .write_all(format!("{}> ", shell.location).as_bytes())
            .await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match shell.execute(&line).await {
            Step::Continue(notice) => {
                output.write_all(format!("{notice}\n").as_bytes()).await?;
            }
            Step::Quit => break,
        }
    }

    info!("shell closed");
    output.write_all(b"\n").await?;
    output.flush().await
}
