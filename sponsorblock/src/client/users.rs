use serde::Deserialize;

use super::prelude::*;

const INFO_STATUSES: &[HttpErrorKind] = &[HttpErrorKind::BadRequest, HttpErrorKind::NotFound];
const COUNTER_STATUSES: &[HttpErrorKind] = &[HttpErrorKind::NotFound];
const INPUT_STATUSES: &[HttpErrorKind] = &[HttpErrorKind::BadRequest];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewCount {
  view_count: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSaved {
  time_saved: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserName {
  user_name: String,
}

impl<T: Transport> Client<T> {
  /// Account record of this client's user, or of another user by public
  /// (hashed) id. Cached for 15 minutes.
  pub fn get_user_info(&self, public_user_id: Option<&str>) -> Result<User> {
    let key = public_user_id.map(str::to_string);
    self.caches.user_info.get_or_try_insert_with(key, || {
      let request = ApiRequest::get(self.url("/api/userInfo"));
      let request = match public_user_id {
        Some(public_user_id) => request.query("publicUserID", public_user_id),
        None => request.query("userID", &self.user_id),
      };
      self.fetch(request, INFO_STATUSES)
    })
  }

  /// How many times segments of this user were skipped. Cached for 1 minute.
  pub fn get_views_for_user(&self) -> Result<u64> {
    self.caches.views.get_or_try_insert_with((), || {
      let request = ApiRequest::get(self.url("/api/getViewsForUser")).query("userID", &self.user_id);
      let ViewCount { view_count } = self.fetch(request, COUNTER_STATUSES)?;
      Ok(view_count)
    })
  }

  /// Minutes saved by segments of this user. Cached for 1 minute.
  pub fn get_saved_time_for_user(&self) -> Result<f64> {
    self.caches.saved_time.get_or_try_insert_with((), || {
      let request =
        ApiRequest::get(self.url("/api/getSavedTimeForUser")).query("userID", &self.user_id);
      let TimeSaved { time_saved } = self.fetch(request, COUNTER_STATUSES)?;
      Ok(time_saved)
    })
  }

  pub fn set_user_name(&self, user_name: &str) -> Result<()> {
    let form = vec![
      ("userID".to_string(), self.user_id.clone()),
      ("username".to_string(), user_name.to_string()),
    ];
    let request = ApiRequest::post(self.url("/api/setUsername")).form(form);
    self.call(request, INPUT_STATUSES)?;
    self.caches.user_name.invalidate(&());
    debug!("User name changed, dropped the cached one");
    Ok(())
  }

  /// Cached for 1 minute, or until [`Client::set_user_name`] succeeds.
  pub fn get_user_name(&self) -> Result<String> {
    self.caches.user_name.get_or_try_insert_with((), || {
      let request = ApiRequest::get(self.url("/api/getUsername")).query("userID", &self.user_id);
      let UserName { user_name } = self.fetch(request, INFO_STATUSES)?;
      Ok(user_name)
    })
  }

  /// The leaderboard, best first. Cached for 1 hour.
  pub fn get_top_users(&self, sort: SortType) -> Result<Vec<TopUser>> {
    self.caches.top_users.get_or_try_insert_with(sort, || {
      let request = ApiRequest::get(self.url("/api/getTopUsers")).query("sortType", sort.value());
      let columns: TopUsersColumns = self.fetch(request, INPUT_STATUSES)?;
      Ok(columns.into_rows())
    })
  }

  /// Finds users by name, as a substring unless `exact` is set.
  /// Keeps the last 300 searches.
  pub fn search_for_user(&self, user_name: &str, exact: bool) -> Result<Vec<SearchedUser>> {
    let key = (user_name.to_string(), exact);
    self.caches.user_search.get_or_try_insert_with(key, || {
      let request = ApiRequest::get(self.url("/api/userID"))
        .query("username", user_name)
        .query("exact", exact);
      self.fetch(request, INFO_STATUSES)
    })
  }
}
