use log::debug;

pub const USER_ID_ENV: &str = "SPONSORBLOCK_USER_ID";

/// Where the private user id lives between runs.
pub trait UserIdStore {
  fn load(&self) -> Option<String>;

  fn save(&self, user_id: &str);
}

/// Keeps the user id in the `SPONSORBLOCK_USER_ID` variable of the current
/// process.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvUserIdStore;

impl UserIdStore for EnvUserIdStore {
  fn load(&self) -> Option<String> {
    std::env::var(USER_ID_ENV)
      .ok()
      .filter(|user_id| !user_id.is_empty())
  }

  fn save(&self, user_id: &str) {
    std::env::set_var(USER_ID_ENV, user_id);
  }
}

/// A fresh 64 hex char private user id.
pub fn generate_user_id() -> String {
  kanon_hash::random_token(32)
}

/// Explicit id first, then the store; a generated id is written back.
pub(crate) fn resolve_user_id(explicit: Option<String>, store: Option<&dyn UserIdStore>) -> String {
  if let Some(user_id) = explicit {
    return user_id;
  }
  if let Some(user_id) = store.and_then(|store| store.load()) {
    return user_id;
  }
  let user_id = generate_user_id();
  debug!("Generated a new user id");
  if let Some(store) = store {
    store.save(&user_id);
  }
  user_id
}
