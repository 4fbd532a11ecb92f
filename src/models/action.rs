pub enum Action {
    RefreshTasks,
    CompleteTask(u64), // Task ID
}
