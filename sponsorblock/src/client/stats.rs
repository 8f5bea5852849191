use super::prelude::*;

impl<T: Transport> Client<T> {
  /// Service-wide counters. `count_contributing_users` adds
  /// [`TotalStats::user_count`]. Cached for 1 minute.
  pub fn get_total_stats(&self, count_contributing_users: bool) -> Result<TotalStats> {
    self
      .caches
      .total_stats
      .get_or_try_insert_with(count_contributing_users, || {
        let request = ApiRequest::get(self.url("/api/getTotalStats"))
          .query("countContributingUsers", count_contributing_users);
        self.fetch(request, &[])
      })
  }

  /// Days saved by every skip ever, as the server rounds it.
  /// Cached for 1 minute.
  pub fn get_saved_days_formatted(&self) -> Result<f64> {
    self.caches.days_saved.get_or_try_insert_with((), || {
      let request = ApiRequest::get(self.url("/api/getDaysSavedFormatted"));
      let DaysSaved { days_saved } = self.fetch(request, &[])?;
      Ok(days_saved)
    })
  }
}
