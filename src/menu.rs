use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::codec;
use crate::date;
use crate::error::Result;
use crate::store::{MarkOutcome, Task, TaskStore};

/// Interactive menu session over an arbitrary reader/writer pair, so the
/// whole surface can be driven by tests without a terminal. The store is
/// written back to `data_file` when the user exits.
pub struct Menu<R, W> {
    store: TaskStore,
    input: R,
    output: W,
    data_file: PathBuf,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(store: TaskStore, input: R, output: W, data_file: PathBuf) -> Self {
        Self {
            store,
            input,
            output,
            data_file,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.clear_screen()?;

        loop {
            self.show_menu()?;
            let choice = self.read_choice()?;
            self.clear_screen()?;

            match choice {
                1 => self.add()?,
                2 => self.view()?,
                3 => self.mark()?,
                4 => self.edit()?,
                5 => self.delete()?,
                _ => {
                    // Save all data before termination.
                    codec::save(&self.data_file, &self.store)?;
                    writeln!(
                        self.output,
                        "Thanks for using the application, have a nice day!"
                    )?;
                    write!(self.output, "Press enter to exit ...")?;
                    self.output.flush()?;
                    self.read_line()?;
                    self.clear_screen()?;
                    return Ok(());
                }
            }

            self.pause()?;
            self.clear_screen()?;
        }
    }

    fn show_menu(&mut self) -> Result<()> {
        writeln!(self.output, "-To Do List-")?;
        writeln!(self.output, "1. Add Task")?;
        writeln!(self.output, "2. View Tasks")?;
        writeln!(self.output, "3. Mark Task as Completed")?;
        writeln!(self.output, "4. Edit Task")?;
        writeln!(self.output, "5. Delete Task")?;
        writeln!(self.output, "6. Exit")?;
        writeln!(self.output)?;
        Ok(())
    }

    /// Prompt until a menu choice in 1-6 is entered. A closed input stream
    /// behaves like choosing Exit, so the store is still saved.
    fn read_choice(&mut self) -> Result<u8> {
        write!(self.output, "Enter a number 1-6: ")?;
        self.output.flush()?;

        loop {
            let Some(line) = self.read_line()? else {
                return Ok(6);
            };
            if let Ok(choice @ 1..=6) = line.trim().parse::<u8>() {
                return Ok(choice);
            }
            write!(
                self.output,
                "Invalid input. Please enter a number within range 1-6: "
            )?;
            self.output.flush()?;
        }
    }

    fn add(&mut self) -> Result<()> {
        writeln!(self.output, "Enter task details (Empty to abort operation):")?;

        write!(self.output, "Title: ")?;
        self.output.flush()?;
        let title = self.require_line()?;
        if title.is_empty() {
            writeln!(self.output, "Abort task.")?;
            return Ok(());
        }

        write!(self.output, "Description: ")?;
        self.output.flush()?;
        let description = self.require_line()?;

        write!(self.output, "Due Date (D/M/YYYY): ")?;
        self.output.flush()?;
        let due_date = self.read_date()?;

        self.store.append(Task::new(title, description, due_date));
        writeln!(self.output, "Task added successfully")?;
        Ok(())
    }

    fn view(&mut self) -> Result<()> {
        writeln!(self.output, "All Tasks")?;

        for (number, task) in self.store.iter().enumerate() {
            writeln!(self.output)?;
            writeln!(self.output, "{:<3}Title: {}", number + 1, task.title)?;
            writeln!(self.output, "   Desc: {}", task.description)?;
            writeln!(self.output, "   Due Date: {}", task.due_date)?;
            writeln!(
                self.output,
                "   Completed: {}",
                if task.completed { "Yes" } else { "No" }
            )?;
        }
        Ok(())
    }

    fn mark(&mut self) -> Result<()> {
        let Some(position) = self.read_position("mark")? else {
            return Ok(());
        };

        match self.store.mark_completed(position)? {
            MarkOutcome::Marked => writeln!(self.output, "Task marked as completed.")?,
            MarkOutcome::AlreadyCompleted => {
                writeln!(self.output, "Task is already marked as completed.")?;
            }
        }
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        let Some(position) = self.read_position("edit")? else {
            return Ok(());
        };
        let current = self.store.get(position)?.clone();

        writeln!(self.output, "Enter task details (Empty to abort operation):")?;

        write!(self.output, "Title (was {}): ", current.title)?;
        self.output.flush()?;
        let title = self.require_line()?;
        // Empty title aborts the whole edit; nothing has been mutated yet.
        if title.is_empty() {
            writeln!(self.output, "Abort task.")?;
            return Ok(());
        }

        write!(self.output, "Description (was {}): ", current.description)?;
        self.output.flush()?;
        let description = self.require_line()?;

        write!(self.output, "Due Date (D/M/YYYY, was {}): ", current.due_date)?;
        self.output.flush()?;
        let due_date = self.read_date()?;

        let mut task = Task::new(title, description, due_date);
        task.completed = current.completed;
        self.store.replace(position, task)?;

        writeln!(self.output, "Task edited successfully")?;
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(position) = self.read_position("remove")? else {
            return Ok(());
        };
        let title = self.store.get(position)?.title.clone();

        write!(self.output, "Confirm to delete \"{}\"? [y/n]: ", title)?;
        self.output.flush()?;
        let answer = self.require_line()?;

        if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            self.store.remove(position)?;
            writeln!(self.output, "Task deleted successfully.")?;
        } else {
            writeln!(self.output, "Delete operation cancelled.")?;
        }
        Ok(())
    }

    /// Prompt for a 1-based task number until one within `[1, len]` is
    /// entered. Non-numeric input and out-of-range numbers get distinct
    /// messages. `Ok(None)` means the user aborted with 0.
    fn read_position(&mut self, action: &str) -> Result<Option<usize>> {
        loop {
            write!(
                self.output,
                "Enter task number to {} (0 to abort operation): ",
                action
            )?;
            self.output.flush()?;

            let line = self.require_line()?;
            let Ok(number) = line.trim().parse::<i64>() else {
                writeln!(self.output, "What you've entered is not a number.")?;
                continue;
            };

            if number == 0 {
                writeln!(self.output, "Abort task.")?;
                return Ok(None);
            }

            if number >= 1 && number as usize <= self.store.len() {
                return Ok(Some(number as usize));
            }

            writeln!(self.output, "Task number is out of range.")?;
        }
    }

    /// Prompt until a valid date is entered, then return its canonical form.
    fn read_date(&mut self) -> Result<String> {
        loop {
            let line = self.require_line()?;
            if let Some(canonical) = date::canonicalize(&line) {
                return Ok(canonical);
            }
            write!(self.output, "Please enter a valid date: ")?;
            self.output.flush()?;
        }
    }

    fn pause(&mut self) -> Result<()> {
        write!(self.output, "\nPress enter to continue ...")?;
        self.output.flush()?;
        self.read_line()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<()> {
        execute!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    /// Read one line with the trailing newline stripped; `None` on a closed
    /// input stream.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Like `read_line`, but a closed input stream mid-operation is an
    /// error rather than something to loop on.
    fn require_line(&mut self) -> Result<String> {
        self.read_line()?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "input stream closed").into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;

    /// Run a full menu session over scripted input, returning the store as
    /// persisted to `path` plus everything written to the output.
    fn run_session(store: TaskStore, input: &str, path: &Path) -> (TaskStore, String) {
        let mut output = Vec::new();
        let mut menu = Menu::new(
            store,
            Cursor::new(input.as_bytes().to_vec()),
            &mut output,
            path.to_path_buf(),
        );
        menu.run().unwrap();
        let saved = codec::load(path).unwrap();
        (saved, String::from_utf8(output).unwrap())
    }

    fn one_task_store(title: &str) -> TaskStore {
        let mut store = TaskStore::new();
        store.append(Task::new(
            title.to_string(),
            String::new(),
            "1/1/2025".to_string(),
        ));
        store
    }

    #[test]
    fn test_add_save_reload_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        // Add "Buy milk" with a sloppily spaced date, then exit.
        let input = "1\nBuy milk\n2%\n 5 / 3 /2025 \n\n6\n";
        let (saved, output) = run_session(TaskStore::new(), input, &path);

        assert!(output.contains("Task added successfully"));
        assert_eq!(saved.len(), 1);
        let task = saved.get(1).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2%");
        assert_eq!(task.due_date, "5/3/2025");
        assert!(!task.completed);
    }

    #[test]
    fn test_add_reprompts_until_date_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        let input = "1\nDentist\n\n31/4/2024\n29/2/2023\n29/2/2024\n\n6\n";
        let (saved, output) = run_session(TaskStore::new(), input, &path);

        assert!(output.contains("Please enter a valid date:"));
        assert_eq!(saved.get(1).unwrap().due_date, "29/2/2024");
    }

    #[test]
    fn test_add_empty_title_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        let input = "1\n\n\n6\n";
        let (saved, output) = run_session(TaskStore::new(), input, &path);

        assert!(output.contains("Abort task."));
        assert!(saved.is_empty());
    }

    #[test]
    fn test_view_lists_tasks_with_positions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        let mut store = one_task_store("Buy milk");
        store.append(Task::new(
            "Pay rent".to_string(),
            "before the 1st".to_string(),
            "1/3/2025".to_string(),
        ));

        let (_, output) = run_session(store, "2\n\n6\n", &path);

        assert!(output.contains("All Tasks"));
        assert!(output.contains("1  Title: Buy milk"));
        assert!(output.contains("2  Title: Pay rent"));
        assert!(output.contains("   Desc: before the 1st"));
        assert!(output.contains("   Completed: No"));
    }

    #[test]
    fn test_mark_outcomes_and_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        // Mark task 1 twice: first marks it, second reports the no-op.
        let input = "3\n1\n\n3\n1\n\n6\n";
        let (saved, output) = run_session(one_task_store("chore"), input, &path);

        assert!(output.contains("Task marked as completed."));
        assert!(output.contains("Task is already marked as completed."));
        assert!(saved.get(1).unwrap().completed);
    }

    #[test]
    fn test_position_prompt_distinguishes_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        // Non-numeric, then out of range, then abort with 0.
        let input = "3\nabc\n9\n0\n\n6\n";
        let (saved, output) = run_session(one_task_store("chore"), input, &path);

        assert!(output.contains("What you've entered is not a number."));
        assert!(output.contains("Task number is out of range."));
        assert!(output.contains("Abort task."));
        assert!(!saved.get(1).unwrap().completed);
    }

    #[test]
    fn test_edit_replaces_fields_and_keeps_completed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        let mut store = one_task_store("old title");
        store.mark_completed(1).unwrap();

        let input = "4\n1\nnew title\nnew desc\n2/2/2026\n\n6\n";
        let (saved, output) = run_session(store, input, &path);

        assert!(output.contains("Title (was old title):"));
        assert!(output.contains("Task edited successfully"));
        let task = saved.get(1).unwrap();
        assert_eq!(task.title, "new title");
        assert_eq!(task.description, "new desc");
        assert_eq!(task.due_date, "2/2/2026");
        assert!(task.completed);
    }

    #[test]
    fn test_edit_empty_title_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        let input = "4\n1\n\n\n6\n";
        let (saved, output) = run_session(one_task_store("keep me"), input, &path);

        assert!(output.contains("Abort task."));
        let task = saved.get(1).unwrap();
        assert_eq!(task.title, "keep me");
        assert_eq!(task.due_date, "1/1/2025");
    }

    #[test]
    fn test_delete_requires_yes_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        // "n" cancels, then "YES" deletes.
        let input = "5\n1\nn\n\n5\n1\nYES\n\n6\n";
        let (saved, output) = run_session(one_task_store("doomed"), input, &path);

        assert!(output.contains("Delete operation cancelled."));
        assert!(output.contains("Confirm to delete \"doomed\"? [y/n]:"));
        assert!(output.contains("Task deleted successfully."));
        assert!(saved.is_empty());
    }

    #[test]
    fn test_invalid_menu_choice_reprompts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        let (_, output) = run_session(TaskStore::new(), "9\nx\n6\n", &path);
        assert!(output.contains("Invalid input. Please enter a number within range 1-6:"));
        assert!(output.contains("Thanks for using the application"));
    }

    #[test]
    fn test_closed_input_at_menu_still_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");

        // Input ends right after the task is added.
        let input = "1\nBuy milk\n\n5/3/2025\n";
        let (saved, _) = run_session(TaskStore::new(), input, &path);
        assert_eq!(saved.len(), 1);
    }
}
