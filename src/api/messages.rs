//! Client-facing message catalog.
//!
//! Persian text, kept byte-for-byte so existing clients that match on the
//! `message` field keep working.

/// Unknown joke id.
pub const JOKE_NOT_FOUND: &str = "جوک یافت نشد!";

/// `GET /jokes` without a `type` filter.
pub const FILTER_MISSING: &str = "جوک با فیلتر یافت نشد!";

/// `POST /jokes` without `jokeText` or `jokeType`.
pub const CREATE_REJECTED: &str = "جوک ثبت نشد! لطفاً متن جوک و نوع جوک را وارد کنید.";

pub const JOKE_CREATED: &str = "جوک موفقانه ثبت گردید";
pub const JOKE_UPDATED: &str = "جوک موفقانه آپدیت شد!";
pub const JOKE_DELETED: &str = "جوک موفقانه حذف شد!";
pub const ALL_JOKES_DELETED: &str = "تمام جوک ها موفقانه حذف شدند!";

/// `GET /jokes/random` on an empty collection.
pub const NO_JOKES_AVAILABLE: &str = "هیچ جوکی موجود نیست!";

/// Request body is not a JSON object, or the result would not be a valid joke.
pub const INVALID_BODY: &str = "بدنه درخواست نامعتبر است!";

/// `POST /jokes` when the largest id has no successor.
pub const IDS_EXHAUSTED: &str = "شناسه جدیدی برای ثبت جوک باقی نمانده است!";

/// No route matched.
pub const ROUTE_NOT_FOUND: &str = "مسیر یافت نشد!";

/// Unexpected server-side failure.
pub const INTERNAL_ERROR: &str = "خطای داخلی سرور!";
