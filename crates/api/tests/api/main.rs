mod helpers;
mod home;
mod summaries;
