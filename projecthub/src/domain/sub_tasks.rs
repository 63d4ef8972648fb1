use super::models::{ContractorId, SubTask, SubTaskId, SubTasks};

impl SubTasks {
    pub fn iter(&self) -> impl Iterator<Item = &SubTask> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &SubTaskId) -> Option<&SubTask> {
        self.0.iter().find(|s| &s.id == id)
    }

    /// Append a new, open sub-task and return it.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        contractor_id: Option<ContractorId>,
    ) -> &SubTask {
        let index = self.0.len();
        self.0.push(SubTask {
            id: SubTaskId::generate(),
            name: name.into(),
            completed: false,
            description: description.filter(|d| !d.trim().is_empty()),
            contractor_id,
        });
        &self.0[index]
    }

    /// Returns the removed sub-task, if any.
    pub fn remove(&mut self, id: &SubTaskId) -> Option<SubTask> {
        let index = self.0.iter().position(|s| &s.id == id)?;
        Some(self.0.remove(index))
    }

    /// Replace the sub-task with the same id. Returns false if there is none.
    pub fn update(&mut self, sub_task: SubTask) -> bool {
        match self.0.iter_mut().find(|s| s.id == sub_task.id) {
            Some(existing) => {
                *existing = sub_task;
                true
            }
            None => false,
        }
    }

    /// Flip completion and return the new state.
    pub fn toggle(&mut self, id: &SubTaskId) -> Option<bool> {
        let sub_task = self.0.iter_mut().find(|s| &s.id == id)?;
        sub_task.completed = !sub_task.completed;
        Some(sub_task.completed)
    }

    /// `(completed, total)`
    pub fn progress(&self) -> (usize, usize) {
        let done = self.0.iter().filter(|s| s.completed).count();
        (done, self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_sub_tasks_start_open() {
        let mut subs = SubTasks::default();
        let first = subs.add("Wireframes", Some("  ".to_string()), None).clone();
        subs.add("Copy", None, Some(ContractorId::new("k1")));

        assert!(!first.completed);
        assert_eq!(first.description, None);
        assert_eq!(subs.len(), 2);
        assert_ne!(subs.iter().next().unwrap().id, subs.iter().nth(1).unwrap().id);
    }

    #[test]
    fn update_replaces_the_whole_record() {
        let mut subs = SubTasks::default();
        let id = subs.add("Wireframes", None, None).id.clone();

        let replacement = SubTask {
            id: id.clone(),
            name: "Hi-fi mockups".to_string(),
            completed: true,
            description: Some("Figma".to_string()),
            contractor_id: Some(ContractorId::new("k2")),
        };
        assert!(subs.update(replacement.clone()));
        assert_eq!(subs.get(&id), Some(&replacement));

        let stranger = SubTask {
            id: SubTaskId::new("other"),
            ..replacement
        };
        assert!(!subs.update(stranger));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn toggle_and_progress() {
        let mut subs = SubTasks::default();
        let a = subs.add("a", None, None).id.clone();
        subs.add("b", None, None);

        assert_eq!(subs.progress(), (0, 2));
        assert_eq!(subs.toggle(&a), Some(true));
        assert_eq!(subs.progress(), (1, 2));
        assert_eq!(subs.toggle(&a), Some(false));
        assert_eq!(subs.toggle(&SubTaskId::new("missing")), None);
    }

    #[test]
    fn remove_by_id() {
        let mut subs = SubTasks::default();
        let a = subs.add("a", None, None).id.clone();
        let b = subs.add("b", None, None).id.clone();

        assert_eq!(subs.remove(&a).map(|s| s.name), Some("a".to_string()));
        assert!(subs.remove(&a).is_none());
        assert_eq!(subs.iter().map(|s| &s.id).collect::<Vec<_>>(), vec![&b]);
    }
}
