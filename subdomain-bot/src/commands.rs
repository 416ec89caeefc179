//! Prefix command parsing

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Commands,
    Balance,
    AddCredits { user: String, amount: u64 },
    RemoveCredits { user: String, amount: u64 },
    CreateSubdomain { name: String },
    RemoveSubdomain { name: String, user: Option<String> },
    ListSubdomains,
    Records,
    ResetAll,
}

/// Why a prefixed message could not become a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No command with this name
    Unknown(String),
    /// Known command with malformed arguments; carries the usage line
    Usage(&'static str),
}

impl Command {
    /// Parse `content` if it starts with `prefix`.
    ///
    /// Returns `None` for messages that are not commands at all.
    pub fn parse(prefix: &str, content: &str) -> Option<Result<Self, ParseError>> {
        let body = content.trim().strip_prefix(prefix)?;
        let mut args = body.split_whitespace();
        let name = args.next()?;
        let args: Vec<&str> = args.collect();

        Some(Self::from_parts(name, &args))
    }

    fn from_parts(name: &str, args: &[&str]) -> Result<Self, ParseError> {
        match name {
            "ping" => Ok(Self::Ping),
            "commands" => Ok(Self::Commands),
            "balance" => Ok(Self::Balance),
            "list_subdomains" => Ok(Self::ListSubdomains),
            "records" => Ok(Self::Records),
            "reset_all" => Ok(Self::ResetAll),
            "add_credits" => {
                let (user, amount) = user_and_amount(args).ok_or(ParseError::Usage(
                    "add_credits @user amount",
                ))?;
                Ok(Self::AddCredits { user, amount })
            }
            "remove_credits" => {
                let (user, amount) = user_and_amount(args).ok_or(ParseError::Usage(
                    "remove_credits @user amount",
                ))?;
                Ok(Self::RemoveCredits { user, amount })
            }
            "create_subdomain" => match args {
                [name] => Ok(Self::CreateSubdomain {
                    name: (*name).to_string(),
                }),
                _ => Err(ParseError::Usage("create_subdomain name")),
            },
            "remove_subdomain" => match args {
                [name] => Ok(Self::RemoveSubdomain {
                    name: (*name).to_string(),
                    user: None,
                }),
                [name, user] => Ok(Self::RemoveSubdomain {
                    name: (*name).to_string(),
                    user: Some((*user).to_string()),
                }),
                _ => Err(ParseError::Usage("remove_subdomain name [@user]")),
            },
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// `<user> <amount>` with a positive amount that also fits a signed delta.
fn user_and_amount(args: &[&str]) -> Option<(String, u64)> {
    let [user, amount] = args else {
        return None;
    };
    let amount = amount.parse::<u64>().ok()?;
    if amount == 0 || i64::try_from(amount).is_err() {
        return None;
    }
    Some(((*user).to_string(), amount))
}
