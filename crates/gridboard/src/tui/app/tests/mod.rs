use super::*;
use crate::tui::event::Action;
use crate::tui::test_utils::{make_app, make_app_with_store, mounted_app};
