use super::*;
use crate::tui::event::Action;

impl<S: KeyValueStore> App<S> {
    /// Applies one key action to the view or the mounted grid.
    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Quit => {
                self.unmount();
                self.should_quit = true;
            }
            Action::AddWidget => match self.view.add_widget() {
                Some(id) => self.set_message(format!("added {id}")),
                None => self.set_message("grid not ready"),
            },
            Action::SaveLayout => self.view.save_layout(),
            Action::LoadLayout => self.view.load_layout(),
            Action::ResetLayout => self.view.reset_layout(),
            Action::LogGridElement => {
                let line = self.view.log_grid_element();
                self.set_message(line);
            }
            Action::SelectNext => {
                if let Some(grid) = &self.grid {
                    grid.select_next();
                }
            }
            Action::Move(dx, dy) => {
                if let Some(grid) = &self.grid {
                    grid.move_selected(dx, dy);
                }
            }
            Action::RemoveSelected => {
                let removed = self.grid.as_ref().and_then(MemoryGrid::remove_selected);
                if let Some(id) = removed.and_then(|w| w.id) {
                    self.set_message(format!("removed {id}"));
                }
            }
        }
    }
}
