pub mod shahid;
