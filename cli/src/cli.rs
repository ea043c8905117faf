use clap::{Args, Parser, Subcommand};
use user_admin_business::{ListQuery, User};
use ustr::Ustr;

#[derive(Parser)]
#[command(name = "user-admin")]
#[command(about = "Manage users of a user-admin backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (defaults to API_BASE_URL, then http://localhost:8080)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token sent with every request (defaults to API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List users, one page at a time
    List {
        /// Zero-based page index
        #[arg(long, short = 'p')]
        page: Option<u32>,

        /// Users per page
        #[arg(long, short = 's')]
        size: Option<u32>,

        /// Sort expression, e.g. "id,desc"
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one user
    Get { login: String },
    /// List the roles a user can be granted
    Roles,
    /// Create a user
    Create {
        #[arg(long, short = 'l')]
        login: String,

        #[command(flatten)]
        fields: UserFields,
    },
    /// Update an existing user; unset fields keep their current value
    Update {
        login: String,

        #[command(flatten)]
        fields: UserFields,
    },
    /// Delete a user
    Delete { login: String },
}

pub fn list_query(page: Option<u32>, size: Option<u32>, sort: Option<String>) -> ListQuery {
    ListQuery { page, size, sort }
}

/// Editable user fields shared by `create` and `update`.
#[derive(Args, Debug, Default, Clone)]
pub struct UserFields {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub lang_key: Option<String>,

    /// Role to grant; repeat for several. Replaces the current roles.
    #[arg(long = "role", short = 'r')]
    pub roles: Vec<String>,

    /// Activate or deactivate the account
    #[arg(long)]
    pub activated: Option<bool>,
}

impl UserFields {
    /// Copy every set field onto `user`.
    pub fn apply_to(self, user: &mut User) {
        if self.email.is_some() {
            user.email = self.email;
        }
        if self.first_name.is_some() {
            user.first_name = self.first_name;
        }
        if self.last_name.is_some() {
            user.last_name = self.last_name;
        }
        if self.lang_key.is_some() {
            user.lang_key = self.lang_key;
        }
        if !self.roles.is_empty() {
            user.authorities = self.roles.iter().map(|r| Ustr::from(r.as_str())).collect();
        }
        if let Some(activated) = self.activated {
            user.activated = activated;
        }
    }

    /// A new user with `login` and these fields. Accounts start activated.
    pub fn into_new_user(self, login: String) -> User {
        let mut user = User {
            activated: true,
            ..User::new(login)
        };
        self.apply_to(&mut user);
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_pagination() {
        let cli = Cli::try_parse_from([
            "user-admin",
            "list",
            "--page",
            "1",
            "--size",
            "20",
            "--sort",
            "id,desc",
        ])
        .unwrap();

        let Commands::List { page, size, sort } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(
            list_query(page, size, sort),
            ListQuery::new().page(1).size(20).sort("id,desc")
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "user-admin",
            "roles",
            "--json",
            "--api-url",
            "http://127.0.0.1:9000",
            "-v",
        ])
        .unwrap();

        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:9000"));
    }

    #[test]
    fn create_requires_login() {
        assert!(Cli::try_parse_from(["user-admin", "create", "--email", "a@b.c"]).is_err());
    }

    #[test]
    fn create_collects_repeated_roles() {
        let cli = Cli::try_parse_from([
            "user-admin",
            "create",
            "--login",
            "jdoe",
            "-r",
            "ROLE_USER",
            "-r",
            "ROLE_ADMIN",
        ])
        .unwrap();

        let Commands::Create { login, fields } = cli.command else {
            panic!("expected create");
        };
        let user = fields.into_new_user(login);
        assert_eq!(user.login, "jdoe");
        assert!(user.activated);
        assert_eq!(
            user.authorities,
            vec![Ustr::from("ROLE_USER"), Ustr::from("ROLE_ADMIN")]
        );
    }

    #[test]
    fn update_fields_keep_unset_values() {
        let mut user = User {
            email: Some("old@example.com".to_owned()),
            first_name: Some("Old".to_owned()),
            authorities: vec![Ustr::from("ROLE_USER")],
            activated: true,
            ..User::new("jdoe")
        };

        UserFields {
            first_name: Some("New".to_owned()),
            activated: Some(false),
            ..UserFields::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.first_name.as_deref(), Some("New"));
        assert_eq!(user.email.as_deref(), Some("old@example.com"));
        assert_eq!(user.authorities, vec![Ustr::from("ROLE_USER")]);
        assert!(!user.activated);
    }
}
