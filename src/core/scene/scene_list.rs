//=========================================================================
// Scene List
//=========================================================================
//
// Ordered scene container with exactly one active scene.
//
// Invariants held after every public call:
//   - exactly one scene has `is_active == true`
//   - `scenes[i].build_index == Some(i)` for every position
//   - the active position always addresses a member
//
// Mutations validate first and only then touch the list, so a rejected
// call leaves everything as it was.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::ops::Index;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, warn};

//=== Internal Dependencies ===============================================

use super::{
    GameObject, Scene, SceneContext, SceneEvent, SceneId, SceneInfo, SceneSelector, SceneTransition,
    TransitionQueue,
};
use crate::core::error::{Result, SceneError, Violation};
use crate::core::naming::first_available_name;

//=== Constants ===========================================================

/// Name given to the scene a default list starts with.
pub const DEFAULT_SCENE_NAME: &str = "Untitled";

/// Deferred transitions applied per activation before the rest are dropped.
pub const DEFAULT_TRANSITION_LIMIT: usize = 64;

//=== Scene List ==========================================================

/// Ordered list of scenes with a single active scene.
///
/// Positions are build indices. Scenes enter through [`append`](Self::append),
/// [`extend`](Self::extend) or [`insert_active`](Self::insert_active) and
/// leave through [`remove`](Self::remove) or [`remove_at`](Self::remove_at);
/// the active scene can never leave.
///
/// Changing the active scene runs the activation protocol: the outgoing
/// scene's active objects get [`SceneEvent::Unloaded`], then the incoming
/// scene's active objects get [`SceneEvent::Loaded`] followed by
/// [`SceneEvent::ActiveChanged`]. Subscribers see the same three events
/// in the same order.
#[derive(Debug)]
pub struct SceneList {
    scenes: Vec<Scene>,
    active: usize,
    subscribers: Vec<Sender<SceneEvent>>,
    transition_limit: usize,
}

impl SceneList {
    //--- Construction -----------------------------------------------------

    /// Creates a list holding one active scene named `"Untitled"`.
    pub fn new() -> Self {
        Self::with_default_name(DEFAULT_SCENE_NAME)
    }

    /// Creates a list holding one active scene with the given name.
    pub fn with_default_name(name: &str) -> Self {
        let mut scene = Scene::new(name, true);
        scene.build_index = Some(0);

        Self {
            scenes: vec![scene],
            active: 0,
            subscribers: Vec::new(),
            transition_limit: DEFAULT_TRANSITION_LIMIT,
        }
    }

    /// Builds a list from scenes in build order.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::ActiveCount`] unless exactly one scene is active.
    pub fn from_scenes(scenes: Vec<Scene>) -> Result<Self> {
        let active_positions: Vec<usize> = scenes
            .iter()
            .enumerate()
            .filter(|(_, scene)| scene.is_active)
            .map(|(position, _)| position)
            .collect();

        let [active] = active_positions[..] else {
            return Err(Violation::ActiveCount(active_positions.len()).into());
        };

        let mut scenes = scenes;
        for (position, scene) in scenes.iter_mut().enumerate() {
            scene.build_index = Some(position);
        }

        debug!(
            "Built scene list of {} scenes, active '{}'",
            scenes.len(),
            scenes[active].name
        );

        Ok(Self {
            scenes,
            active,
            subscribers: Vec::new(),
            transition_limit: DEFAULT_TRANSITION_LIMIT,
        })
    }

    /// Creates a detached scene whose name does not clash with any member.
    ///
    /// The name is `name` if free, otherwise `"name N"` for the smallest
    /// free `N`. It is fixed at this point; later additions do not rename it.
    pub fn create_scene(&self, name: &str, is_active: bool) -> Scene {
        Scene::new(first_available_name(name, self.names()), is_active)
    }

    //--- Configuration ----------------------------------------------------

    /// Caps how many deferred transitions one activation may trigger.
    ///
    /// # Panics
    ///
    /// Panics if `limit == 0`.
    pub fn set_transition_limit(&mut self, limit: usize) {
        assert!(limit > 0, "Transition limit must be positive");
        self.transition_limit = limit;
    }

    pub fn transition_limit(&self) -> usize {
        self.transition_limit
    }

    //--- Queries ----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Always `false`: a list holds at least its active scene.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Scene> {
        self.scenes.get(position)
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    pub fn position_of(&self, id: SceneId) -> Option<usize> {
        self.scenes.iter().position(|scene| scene.id == id)
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scene> {
        self.scenes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.scenes.iter().map(|scene| scene.name.as_str())
    }

    /// First scene with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.name == name)
    }

    /// First scene with the given kind.
    pub fn find_by_kind(&self, kind: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.kind == kind)
    }

    /// Position of the scene a selector designates, if any.
    pub fn resolve(&self, selector: &SceneSelector) -> Option<usize> {
        match selector {
            SceneSelector::Name(name) => self.scenes.iter().position(|scene| &scene.name == name),
            SceneSelector::Index(index) => (*index < self.scenes.len()).then_some(*index),
            SceneSelector::Id(id) => self.position_of(*id),
        }
    }

    pub fn active(&self) -> &Scene {
        &self.scenes[self.active]
    }

    /// Build index of the active scene.
    pub fn active_index(&self) -> usize {
        self.active
    }

    //--- Game Object Access -----------------------------------------------
    //
    // Member scenes are only reachable mutably through their game objects,
    // never as a whole `Scene`, so the active flag and build indices stay
    // under the list's control.
    //

    /// Game objects of the scene at `position`.
    pub fn game_objects_mut(&mut self, position: usize) -> Option<&mut Vec<Box<dyn GameObject>>> {
        self.scenes.get_mut(position).map(Scene::game_objects_mut)
    }

    /// Game objects of the active scene.
    pub fn active_game_objects_mut(&mut self) -> &mut Vec<Box<dyn GameObject>> {
        self.scenes[self.active].game_objects_mut()
    }

    //--- Subscriptions ----------------------------------------------------

    /// Returns a receiver mirroring every lifecycle notification.
    ///
    /// Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> Receiver<SceneEvent> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    //--- Insertion --------------------------------------------------------

    /// Appends an inactive scene at the next build index.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::InsertActive`] if `scene` is flagged active; use
    /// [`insert_active`](Self::insert_active) to add and activate a scene.
    pub fn append(&mut self, scene: Scene) -> Result<SceneId> {
        if scene.is_active {
            return Err(Violation::InsertActive { name: scene.name }.into());
        }

        Ok(self.push_scene(scene))
    }

    /// Appends inactive scenes in order, continuing the build indices.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::InsertActive`] if any scene is flagged active.
    /// Nothing is appended in that case.
    pub fn extend<I>(&mut self, scenes: I) -> Result<()>
    where
        I: IntoIterator<Item = Scene>,
    {
        let scenes: Vec<Scene> = scenes.into_iter().collect();

        if let Some(scene) = scenes.iter().find(|scene| scene.is_active) {
            return Err(Violation::InsertActive {
                name: scene.name.clone(),
            }
            .into());
        }

        for scene in scenes {
            self.push_scene(scene);
        }
        Ok(())
    }

    /// Consumes the list and returns it with `scenes` appended.
    ///
    /// # Errors
    ///
    /// Same as [`extend`](Self::extend). The list is dropped on failure;
    /// use `extend` to keep it.
    pub fn concat<I>(mut self, scenes: I) -> Result<Self>
    where
        I: IntoIterator<Item = Scene>,
    {
        self.extend(scenes)?;
        Ok(self)
    }

    //--- Removal ----------------------------------------------------------

    /// Removes the scene at `position` and returns it detached.
    ///
    /// Later scenes move down one build index.
    ///
    /// # Errors
    ///
    /// [`SceneError::OutOfBounds`] past the end, [`Violation::RemoveActive`]
    /// for the active scene.
    pub fn remove_at(&mut self, position: usize) -> Result<Scene> {
        self.check_bounds(position)?;

        if position == self.active {
            return Err(Violation::RemoveActive {
                name: self.scenes[position].name.clone(),
            }
            .into());
        }

        Ok(self.detach(position))
    }

    /// Removes a scene by identity.
    ///
    /// Returns `Ok(None)` if `id` is not a member.
    ///
    /// # Errors
    ///
    /// Returns [`Violation::RemoveActive`] for the active scene.
    pub fn remove(&mut self, id: SceneId) -> Result<Option<Scene>> {
        match self.position_of(id) {
            Some(position) => self.remove_at(position).map(Some),
            None => Ok(None),
        }
    }

    //--- Replacement ------------------------------------------------------

    /// Replaces the scene at `position` and returns the replaced scene.
    ///
    /// - Replacing the active scene requires an active replacement; the
    ///   activation protocol then runs with the replaced scene as outgoing.
    /// - An active replacement for an inactive slot takes the active flag
    ///   from the current active scene through the activation protocol.
    /// - Otherwise the swap has no side effects.
    ///
    /// # Errors
    ///
    /// [`SceneError::OutOfBounds`] past the end,
    /// [`Violation::ReplaceActiveWithInactive`] when the active scene would be
    /// replaced by an inactive one.
    pub fn set_at(&mut self, position: usize, scene: Scene) -> Result<Scene> {
        self.check_bounds(position)?;

        let replacing_active = position == self.active;
        if replacing_active && !scene.is_active {
            return Err(Violation::ReplaceActiveWithInactive { position }.into());
        }

        let activates = scene.is_active;
        let mut scene = scene;
        scene.build_index = Some(position);

        let mut replaced = std::mem::replace(&mut self.scenes[position], scene);
        debug!(
            "Replaced scene '{}' with '{}' at build index {}",
            replaced.name, self.scenes[position].name, position
        );

        if replacing_active {
            let pending = self.run_activation(position, Some(&mut replaced));
            self.apply_transitions(pending);
        } else if activates {
            self.activate(position);
        }

        replaced.build_index = None;
        Ok(replaced)
    }

    //--- Activation -------------------------------------------------------

    /// Makes a member the active scene and runs the activation protocol.
    ///
    /// Activating the scene that is already active reloads it: all three
    /// notifications still fire. Returns `None` if `id` is not a member.
    pub fn set_active(&mut self, id: SceneId) -> Option<&Scene> {
        let position = self.position_of(id)?;
        self.activate(position);
        self.scene(id)
    }

    /// Activates the scene a selector designates.
    pub fn activate_selected(&mut self, selector: &SceneSelector) -> Option<&Scene> {
        let position = self.resolve(selector)?;
        let id = self.scenes[position].id;
        self.activate(position);
        self.scene(id)
    }

    /// Appends `scene` and makes it the active scene.
    ///
    /// The scene's own active flag is ignored on the way in.
    pub fn insert_active(&mut self, scene: Scene) -> SceneId {
        let id = self.push_scene(scene);
        self.activate(self.scenes.len() - 1);
        id
    }

    //--- Internal Helpers -------------------------------------------------

    fn check_bounds(&self, position: usize) -> Result<()> {
        if position < self.scenes.len() {
            Ok(())
        } else {
            Err(SceneError::OutOfBounds {
                position,
                len: self.scenes.len(),
            })
        }
    }

    fn push_scene(&mut self, mut scene: Scene) -> SceneId {
        let position = self.scenes.len();
        scene.build_index = Some(position);
        let id = scene.id;

        debug!("Appending scene '{}' at build index {}", scene.name, position);
        self.scenes.push(scene);
        id
    }

    fn detach(&mut self, position: usize) -> Scene {
        let mut scene = self.scenes.remove(position);
        scene.build_index = None;

        for (index, later) in self.scenes.iter_mut().enumerate().skip(position) {
            later.build_index = Some(index);
        }
        if self.active > position {
            self.active -= 1;
        }

        debug!("Removed scene '{}' from build index {}", scene.name, position);
        scene
    }

    fn activate(&mut self, position: usize) {
        let pending = self.run_activation(position, None);
        self.apply_transitions(pending);
    }

    /// Moves the active flag to `incoming` and fires the three notifications.
    ///
    /// `detached` is the outgoing scene when it has already been swapped out
    /// of the list; otherwise the current active member is outgoing.
    /// Returns the transitions handlers queued.
    fn run_activation(
        &mut self,
        incoming: usize,
        mut detached: Option<&mut Scene>,
    ) -> TransitionQueue {
        //--- Step 1: Move the active flag ----------------------------------
        let outgoing_position = self.active;
        let outgoing_info = match detached.as_deref_mut() {
            Some(outgoing) => {
                outgoing.is_active = false;
                outgoing.info()
            }
            None => {
                let outgoing = &mut self.scenes[outgoing_position];
                outgoing.is_active = false;
                outgoing.info()
            }
        };

        self.scenes[incoming].is_active = true;
        self.active = incoming;
        let incoming_info = self.scenes[incoming].info();

        debug!(
            "Active scene '{}' -> '{}'",
            outgoing_info.name, incoming_info.name
        );

        //--- Step 2: Notify in order ---------------------------------------
        let snapshot: Vec<SceneInfo> = self.scenes.iter().map(Scene::info).collect();
        let mut transitions = TransitionQueue::new();
        let mut context = SceneContext {
            scenes: &snapshot,
            active: incoming,
            transitions: &mut transitions,
        };

        let unloaded = SceneEvent::Unloaded {
            scene: outgoing_info.clone(),
        };
        match detached {
            Some(outgoing) => outgoing.broadcast(&unloaded, &mut context),
            None => self.scenes[outgoing_position].broadcast(&unloaded, &mut context),
        }
        self.publish(unloaded);

        let loaded = SceneEvent::Loaded {
            scene: incoming_info.clone(),
        };
        self.scenes[incoming].broadcast(&loaded, &mut context);
        self.publish(loaded);

        let changed = SceneEvent::ActiveChanged {
            previous: outgoing_info,
            current: incoming_info,
        };
        self.scenes[incoming].broadcast(&changed, &mut context);
        self.publish(changed);

        transitions
    }

    /// Applies queued transitions in FIFO order.
    ///
    /// Transitions queued by an activation triggered here join the back of
    /// the queue. Stops after `transition_limit` transitions.
    fn apply_transitions(&mut self, mut pending: TransitionQueue) {
        let mut applied = 0usize;

        while !pending.is_empty() {
            let batch = pending.take();
            let batch_len = batch.len();

            for (offset, transition) in batch.into_iter().enumerate() {
                if applied == self.transition_limit {
                    error!(
                        "Transition limit ({}) reached, dropping {} queued transitions",
                        self.transition_limit,
                        batch_len - offset + pending.len()
                    );
                    return;
                }
                applied += 1;

                match transition {
                    SceneTransition::Activate(selector) => match self.resolve(&selector) {
                        Some(position) => {
                            let mut produced = self.run_activation(position, None);
                            pending.append(&mut produced);
                        }
                        None => warn!("Queued activation of {:?} matched no scene, skipping", selector),
                    },
                    SceneTransition::Remove(id) => match self.remove(id) {
                        Ok(Some(scene)) => debug!("Queued removal dropped scene '{}'", scene.name),
                        Ok(None) => warn!("Queued removal of {} matched no scene, skipping", id),
                        Err(e) => warn!("Queued removal of {} rejected: {}", id, e),
                    },
                }
            }
        }
    }

    fn publish(&mut self, event: SceneEvent) {
        if self.subscribers.is_empty() {
            return;
        }

        let before = self.subscribers.len();
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());

        if self.subscribers.len() < before {
            debug!(
                "Pruned {} disconnected scene event subscribers",
                before - self.subscribers.len()
            );
        }
    }
}

impl Default for SceneList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for SceneList {
    type Output = Scene;

    fn index(&self, position: usize) -> &Scene {
        &self.scenes[position]
    }
}

impl<'a> IntoIterator for &'a SceneList {
    type Item = &'a Scene;
    type IntoIter = std::slice::Iter<'a, Scene>;

    fn into_iter(self) -> Self::IntoIter {
        self.scenes.iter()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<String>>>;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn new_log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    /// Records every notification it receives as `tag:event(...)`.
    struct Recorder {
        tag: &'static str,
        active: bool,
        log: Log,
    }

    impl Recorder {
        fn new(tag: &'static str, log: &Log) -> Self {
            Self {
                tag,
                active: true,
                log: Rc::clone(log),
            }
        }

        fn inactive(tag: &'static str, log: &Log) -> Self {
            Self {
                active: false,
                ..Self::new(tag, log)
            }
        }
    }

    impl GameObject for Recorder {
        fn is_active(&self) -> bool {
            self.active
        }

        fn on_scene_unloaded(&mut self, scene: &SceneInfo, _context: &mut SceneContext<'_>) {
            self.log
                .borrow_mut()
                .push(format!("{}:unload({})", self.tag, scene.name));
        }

        fn on_scene_loaded(&mut self, scene: &SceneInfo, _context: &mut SceneContext<'_>) {
            self.log
                .borrow_mut()
                .push(format!("{}:load({})", self.tag, scene.name));
        }

        fn on_active_scene_changed(
            &mut self,
            previous: &SceneInfo,
            current: &SceneInfo,
            _context: &mut SceneContext<'_>,
        ) {
            self.log.borrow_mut().push(format!(
                "{}:changed({},{})",
                self.tag, previous.name, current.name
            ));
        }
    }

    /// Queues a transition the first time its scene is loaded.
    struct Requester {
        on_load: Option<SceneTransition>,
    }

    impl GameObject for Requester {
        fn on_scene_loaded(&mut self, _scene: &SceneInfo, context: &mut SceneContext<'_>) {
            if let Some(transition) = self.on_load.take() {
                context.request(transition);
            }
        }
    }

    /// Requests the named scene every time its own scene loads.
    struct Bouncer {
        target: &'static str,
    }

    impl GameObject for Bouncer {
        fn on_scene_loaded(&mut self, _scene: &SceneInfo, context: &mut SceneContext<'_>) {
            context.request(SceneTransition::Activate(self.target.into()));
        }
    }

    fn assert_consistent(list: &SceneList) {
        let active: Vec<&Scene> = list.iter().filter(|scene| scene.is_active()).collect();
        assert_eq!(active.len(), 1, "exactly one scene must be active");
        assert_eq!(active[0].id(), list.active().id());
        assert_eq!(active[0].build_index(), Some(list.active_index()));

        for (position, scene) in list.iter().enumerate() {
            assert_eq!(scene.build_index(), Some(position), "dense build indices");
        }
    }

    fn state(list: &SceneList) -> Vec<(String, Option<usize>, bool)> {
        list.iter()
            .map(|scene| (scene.name().to_string(), scene.build_index(), scene.is_active()))
            .collect()
    }

    /// A(active), B, C with a recorder in A and C.
    fn three_scenes(log: &Log) -> SceneList {
        SceneList::from_scenes(vec![
            Scene::new("A", true).with_game_object(Recorder::new("a", log)),
            Scene::new("B", false),
            Scene::new("C", false).with_game_object(Recorder::new("c", log)),
        ])
        .unwrap()
    }

    //--- Construction Tests -----------------------------------------------

    #[test]
    fn default_list_has_one_active_untitled_scene() {
        let list = SceneList::new();

        assert_eq!(list.len(), 1);
        assert_eq!(list.active().name(), "Untitled");
        assert_eq!(list.active().build_index(), Some(0));
        assert!(list.active().is_active());
        assert_consistent(&list);
    }

    #[test]
    fn from_scenes_assigns_positions() {
        let list = SceneList::from_scenes(vec![
            Scene::new("A", false),
            Scene::new("B", true),
            Scene::new("C", false),
        ])
        .unwrap();

        assert_eq!(list.active().name(), "B");
        assert_eq!(list.active_index(), 1);
        assert_eq!(list[2].build_index(), Some(2));
        assert_consistent(&list);
    }

    #[test]
    fn from_scenes_rejects_wrong_active_count() {
        let two = SceneList::from_scenes(vec![Scene::new("A", true), Scene::new("B", true)]);
        assert_eq!(two.unwrap_err(), SceneError::from(Violation::ActiveCount(2)));

        let none = SceneList::from_scenes(vec![Scene::new("A", false)]);
        assert_eq!(none.unwrap_err(), SceneError::from(Violation::ActiveCount(0)));

        let empty = SceneList::from_scenes(Vec::new());
        assert_eq!(empty.unwrap_err(), SceneError::from(Violation::ActiveCount(0)));
    }

    #[test]
    fn create_scene_disambiguates_names() {
        let mut list = SceneList::from_scenes(vec![Scene::new("Level", true)]).unwrap();

        let first = list.create_scene("Level", false);
        assert_eq!(first.name(), "Level 1");
        list.append(first).unwrap();

        let second = list.create_scene("Level", false);
        assert_eq!(second.name(), "Level 2");

        assert_eq!(list.create_scene("Menu", false).name(), "Menu");
    }

    //--- Activation Protocol Tests ----------------------------------------

    #[test]
    fn three_scene_activation_sequence() {
        init_logging();
        let log = new_log();
        let mut list = three_scenes(&log);
        let c = list[2].id();

        let activated = list.set_active(c).map(|scene| scene.name().to_string());
        assert_eq!(activated.as_deref(), Some("C"));

        assert!(!list[0].is_active());
        assert!(list[2].is_active());
        assert_eq!(
            *log.borrow(),
            vec!["a:unload(A)", "c:load(C)", "c:changed(A,C)"]
        );
        let indices: Vec<_> = list.iter().map(Scene::build_index).collect();
        assert_eq!(indices, vec![Some(0), Some(1), Some(2)]);
        assert_consistent(&list);
    }

    #[test]
    fn activating_the_active_scene_reloads_it() {
        let log = new_log();
        let mut list = three_scenes(&log);
        let a = list[0].id();

        list.set_active(a);

        assert_eq!(
            *log.borrow(),
            vec!["a:unload(A)", "a:load(A)", "a:changed(A,A)"]
        );
        assert!(list[0].is_active());
        assert_consistent(&list);
    }

    #[test]
    fn set_active_on_non_member_is_absent() {
        let log = new_log();
        let mut list = three_scenes(&log);
        let stranger = Scene::new("Stranger", false);

        assert!(list.set_active(stranger.id()).is_none());
        assert!(log.borrow().is_empty());
        assert_eq!(list.active().name(), "A");
    }

    #[test]
    fn append_then_activate_matches_insert_active() {
        let mut appended = SceneList::from_scenes(vec![Scene::new("A", true), Scene::new("B", false)]).unwrap();
        let mut inserted = SceneList::from_scenes(vec![Scene::new("A", true), Scene::new("B", false)]).unwrap();

        let id = appended.append(Scene::new("C", false)).unwrap();
        appended.set_active(id);

        inserted.insert_active(Scene::new("C", true));

        assert_eq!(state(&appended), state(&inserted));
        assert_eq!(appended.active().name(), "C");
        assert_consistent(&appended);
        assert_consistent(&inserted);
    }

    #[test]
    fn insert_active_notifies_new_scene() {
        let log = new_log();
        let mut list = three_scenes(&log);

        list.insert_active(Scene::new("D", false).with_game_object(Recorder::new("d", &log)));

        assert_eq!(
            *log.borrow(),
            vec!["a:unload(A)", "d:load(D)", "d:changed(A,D)"]
        );
        assert_eq!(list.active_index(), 3);
        assert_consistent(&list);
    }

    #[test]
    fn inactive_objects_are_skipped() {
        let log = new_log();
        let mut list = SceneList::from_scenes(vec![
            Scene::new("A", true)
                .with_game_object(Recorder::inactive("sleeping", &log))
                .with_game_object(Recorder::new("awake", &log)),
            Scene::new("B", false).with_game_object(Recorder::inactive("hidden", &log)),
        ])
        .unwrap();
        let b = list[1].id();

        list.set_active(b);

        assert_eq!(*log.borrow(), vec!["awake:unload(A)"]);
    }

    //--- Game Object Access Tests -----------------------------------------

    #[test]
    fn game_objects_added_through_list_receive_notifications() {
        let log = new_log();
        let mut list = three_scenes(&log);

        list.active_game_objects_mut()
            .push(Box::new(Recorder::new("a2", &log)));
        list.game_objects_mut(1)
            .unwrap()
            .push(Box::new(Recorder::new("b", &log)));
        assert!(list.game_objects_mut(3).is_none());

        let b = list[1].id();
        list.set_active(b);

        assert_eq!(
            *log.borrow(),
            vec!["a:unload(A)", "a2:unload(A)", "b:load(B)", "b:changed(A,B)"]
        );
        assert_eq!(list[0].game_objects().len(), 2);
        assert_consistent(&list);
    }

    #[test]
    fn clearing_game_objects_keeps_list_consistent() {
        let log = new_log();
        let mut list = three_scenes(&log);

        list.active_game_objects_mut().clear();
        let c = list[2].id();
        list.set_active(c);

        assert_eq!(*log.borrow(), vec!["c:load(C)", "c:changed(A,C)"]);
        assert_eq!(state(&list)[2], ("C".to_string(), Some(2), true));
        assert_consistent(&list);
    }

    #[test]
    fn subscribers_see_the_same_order() {
        let log = new_log();
        let mut list = three_scenes(&log);
        let events = list.subscribe();
        let (a, c) = (list[0].info(), list[2].info());

        list.set_active(c.id);

        let received: Vec<SceneEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SceneEvent::Unloaded { scene: a.clone() },
                SceneEvent::Loaded { scene: c.clone() },
                SceneEvent::ActiveChanged {
                    previous: a,
                    current: c,
                },
            ]
        );
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut list = SceneList::new();
        let kept = list.subscribe();
        drop(list.subscribe());

        let id = list.active().id();
        list.set_active(id);

        assert_eq!(list.subscribers.len(), 1);
        assert_eq!(kept.try_iter().count(), 3);
    }

    //--- Deferred Transition Tests ----------------------------------------

    #[test]
    fn handler_requested_activation_runs_after_protocol() {
        let log = new_log();
        let mut list = SceneList::from_scenes(vec![
            Scene::new("A", true).with_game_object(Recorder::new("a", &log)),
            Scene::new("B", false).with_game_object(Recorder::new("b", &log)),
            Scene::new("C", false)
                .with_game_object(Requester {
                    on_load: Some(SceneTransition::Activate("B".into())),
                })
                .with_game_object(Recorder::new("c", &log)),
        ])
        .unwrap();
        let c = list[2].id();

        list.set_active(c);

        assert_eq!(
            *log.borrow(),
            vec![
                "a:unload(A)",
                "c:load(C)",
                "c:changed(A,C)",
                "c:unload(C)",
                "b:load(B)",
                "b:changed(C,B)",
            ]
        );
        assert_eq!(list.active().name(), "B");
        assert_consistent(&list);
    }

    #[test]
    fn unload_handler_request_waits_for_current_load() {
        struct LeaveTo {
            target: &'static str,
        }

        impl GameObject for LeaveTo {
            fn on_scene_unloaded(&mut self, _scene: &SceneInfo, context: &mut SceneContext<'_>) {
                context.request(SceneTransition::Activate(self.target.into()));
            }
        }

        let log = new_log();
        let mut list = SceneList::from_scenes(vec![
            Scene::new("A", true).with_game_object(LeaveTo { target: "C" }),
            Scene::new("B", false).with_game_object(Recorder::new("b", &log)),
            Scene::new("C", false).with_game_object(Recorder::new("c", &log)),
        ])
        .unwrap();
        let b = list[1].id();

        list.set_active(b);

        // B finishes loading before the request from A's unload runs
        assert_eq!(
            *log.borrow(),
            vec![
                "b:load(B)",
                "b:changed(A,B)",
                "b:unload(B)",
                "c:load(C)",
                "c:changed(B,C)",
            ]
        );
        assert_eq!(list.active().name(), "C");
        assert_consistent(&list);
    }

    #[test]
    fn handler_sees_consistent_snapshot() {
        struct Inspector {
            seen: Rc<RefCell<Vec<(String, usize)>>>,
        }

        impl GameObject for Inspector {
            fn on_scene_unloaded(&mut self, _scene: &SceneInfo, context: &mut SceneContext<'_>) {
                self.seen.borrow_mut().push((
                    context.active_scene().name.clone(),
                    context.scenes().len(),
                ));
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut list = SceneList::from_scenes(vec![
            Scene::new("A", true).with_game_object(Inspector {
                seen: Rc::clone(&seen),
            }),
            Scene::new("B", false),
        ])
        .unwrap();
        let b = list[1].id();

        list.set_active(b);

        // Even while A is being unloaded, the list already shows B as active
        assert_eq!(*seen.borrow(), vec![("B".to_string(), 2)]);
    }

    #[test]
    fn handler_requested_removal_renumbers() {
        struct Cleaner;

        impl GameObject for Cleaner {
            fn on_active_scene_changed(
                &mut self,
                previous: &SceneInfo,
                _current: &SceneInfo,
                context: &mut SceneContext<'_>,
            ) {
                context.request(SceneTransition::Remove(previous.id));
            }
        }

        let mut list = SceneList::from_scenes(vec![
            Scene::new("A", true),
            Scene::new("B", false),
            Scene::new("C", false).with_game_object(Cleaner),
        ])
        .unwrap();
        let c = list[2].id();

        list.set_active(c);

        let names: Vec<_> = list.names().collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(list.active_index(), 1);
        assert_consistent(&list);
    }

    #[test]
    fn transition_limit_stops_ping_pong() {
        init_logging();
        let mut list = SceneList::from_scenes(vec![
            Scene::new("A", true).with_game_object(Bouncer { target: "B" }),
            Scene::new("B", false).with_game_object(Bouncer { target: "A" }),
        ])
        .unwrap();
        list.set_transition_limit(4);
        let events = list.subscribe();
        let b = list[1].id();

        list.set_active(b);

        let changes = events
            .try_iter()
            .filter(|event| matches!(event, SceneEvent::ActiveChanged { .. }))
            .count();
        assert_eq!(changes, 5);
        assert_consistent(&list);
    }

    #[test]
    #[should_panic(expected = "Transition limit must be positive")]
    fn zero_transition_limit_panics() {
        SceneList::new().set_transition_limit(0);
    }

    //--- Removal Tests ----------------------------------------------------

    #[test]
    fn remove_at_renumbers_later_scenes() {
        let mut list = SceneList::from_scenes(
            ["S0", "S1", "S2", "S3", "S4"]
                .iter()
                .enumerate()
                .map(|(i, name)| Scene::new(*name, i == 0))
                .collect(),
        )
        .unwrap();
        let ids: Vec<SceneId> = list.iter().map(Scene::id).collect();

        let removed = list.remove_at(2).unwrap();

        assert_eq!(removed.name(), "S2");
        assert_eq!(removed.build_index(), None);
        assert_eq!(list.scene(ids[0]).unwrap().build_index(), Some(0));
        assert_eq!(list.scene(ids[1]).unwrap().build_index(), Some(1));
        assert_eq!(list.scene(ids[3]).unwrap().build_index(), Some(2));
        assert_eq!(list.scene(ids[4]).unwrap().build_index(), Some(3));
        assert_consistent(&list);
    }

    #[test]
    fn removing_before_active_shifts_active_index() {
        let mut list = SceneList::from_scenes(vec![
            Scene::new("A", false),
            Scene::new("B", false),
            Scene::new("C", true),
        ])
        .unwrap();

        list.remove_at(0).unwrap();

        assert_eq!(list.active().name(), "C");
        assert_eq!(list.active_index(), 1);
        assert_consistent(&list);
    }

    #[test]
    fn remove_by_id() {
        let mut list = SceneList::from_scenes(vec![
            Scene::new("A", true),
            Scene::new("B", false),
            Scene::new("C", false),
        ])
        .unwrap();
        let b = list[1].id();

        let removed = list.remove(b).unwrap().unwrap();
        assert_eq!(removed.name(), "B");
        assert_eq!(list[1].name(), "C");
        assert_eq!(list[1].build_index(), Some(1));

        // Already gone
        assert!(list.remove(b).unwrap().is_none());
        assert_consistent(&list);
    }

    #[test]
    fn removing_active_scene_is_rejected() {
        let log = new_log();
        let mut list = three_scenes(&log);
        let before = state(&list);
        let a = list[0].id();

        assert_eq!(
            list.remove_at(0).unwrap_err(),
            SceneError::from(Violation::RemoveActive { name: "A".into() })
        );
        assert!(list.remove(a).is_err());
        assert_eq!(state(&list), before);
    }

    #[test]
    fn remove_at_out_of_bounds() {
        let mut list = SceneList::new();
        assert_eq!(
            list.remove_at(3).unwrap_err(),
            SceneError::OutOfBounds { position: 3, len: 1 }
        );
    }

    //--- Insertion Tests --------------------------------------------------

    #[test]
    fn appending_active_scene_is_rejected() {
        let mut list = SceneList::new();
        let before = state(&list);

        let err = list.append(Scene::new("Rogue", true)).unwrap_err();

        assert_eq!(
            err,
            SceneError::from(Violation::InsertActive { name: "Rogue".into() })
        );
        assert_eq!(state(&list), before);
    }

    #[test]
    fn extend_continues_indices() {
        let mut list = SceneList::new();
        list.extend(vec![Scene::new("B", false), Scene::new("C", false)])
            .unwrap();

        let indices: Vec<_> = list.iter().map(Scene::build_index).collect();
        assert_eq!(indices, vec![Some(0), Some(1), Some(2)]);
        assert_consistent(&list);
    }

    #[test]
    fn extend_with_active_scene_appends_nothing() {
        let mut list = SceneList::new();

        let result = list.extend(vec![Scene::new("B", false), Scene::new("C", true)]);

        assert!(matches!(
            result,
            Err(SceneError::InvariantViolation(Violation::InsertActive { .. }))
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn concat_returns_extended_list() {
        let list = SceneList::new()
            .concat(vec![Scene::new("B", false)])
            .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[1].name(), "B");
        assert_consistent(&list);

        assert!(SceneList::new().concat(vec![Scene::new("B", true)]).is_err());
    }

    //--- Replacement Tests ------------------------------------------------

    #[test]
    fn replacing_active_with_inactive_is_rejected() {
        let log = new_log();
        let mut list = three_scenes(&log);
        let before = state(&list);

        let err = list.set_at(0, Scene::new("Z", false)).unwrap_err();

        assert_eq!(
            err,
            SceneError::from(Violation::ReplaceActiveWithInactive { position: 0 })
        );
        assert_eq!(state(&list), before);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn replacing_active_with_active_reloads() {
        let log = new_log();
        let mut list = three_scenes(&log);

        let replaced = list
            .set_at(0, Scene::new("A2", true).with_game_object(Recorder::new("a2", &log)))
            .unwrap();

        assert_eq!(replaced.name(), "A");
        assert!(!replaced.is_active());
        assert_eq!(replaced.build_index(), None);
        assert_eq!(list.active().name(), "A2");
        assert_eq!(
            *log.borrow(),
            vec!["a:unload(A)", "a2:load(A2)", "a2:changed(A,A2)"]
        );
        assert_consistent(&list);
    }

    #[test]
    fn active_replacement_takes_over_from_other_slot() {
        let log = new_log();
        let mut list = three_scenes(&log);

        let replaced = list
            .set_at(1, Scene::new("B2", true).with_game_object(Recorder::new("b2", &log)))
            .unwrap();

        assert_eq!(replaced.name(), "B");
        assert!(!list[0].is_active());
        assert_eq!(list.active().name(), "B2");
        assert_eq!(list.active_index(), 1);
        assert_eq!(
            *log.borrow(),
            vec!["a:unload(A)", "b2:load(B2)", "b2:changed(A,B2)"]
        );
        assert_consistent(&list);
    }

    #[test]
    fn plain_replacement_is_silent() {
        let log = new_log();
        let mut list = three_scenes(&log);

        let replaced = list.set_at(2, Scene::new("C2", false)).unwrap();

        assert_eq!(replaced.name(), "C");
        assert_eq!(list[2].name(), "C2");
        assert_eq!(list[2].build_index(), Some(2));
        assert_eq!(list.active().name(), "A");
        assert!(log.borrow().is_empty());
        assert_consistent(&list);
    }

    #[test]
    fn set_at_out_of_bounds() {
        let mut list = SceneList::new();
        assert_eq!(
            list.set_at(1, Scene::new("X", false)).unwrap_err(),
            SceneError::OutOfBounds { position: 1, len: 1 }
        );
    }

    //--- Invariant Tests --------------------------------------------------

    #[test]
    fn invariants_hold_across_mixed_operations() {
        let mut list = SceneList::new();
        assert_consistent(&list);

        let b = list.append(Scene::new("B", false)).unwrap();
        assert_consistent(&list);

        list.extend(vec![Scene::new("C", false), Scene::new("D", false)])
            .unwrap();
        assert_consistent(&list);

        list.set_active(b);
        assert_consistent(&list);

        list.remove_at(0).unwrap();
        assert_consistent(&list);

        let e = list.insert_active(Scene::new("E", false));
        assert_consistent(&list);

        list.set_at(0, Scene::new("B2", true)).unwrap();
        assert_consistent(&list);

        list.remove(e).unwrap();
        assert_consistent(&list);

        assert!(list.remove_at(list.active_index()).is_err());
        assert_consistent(&list);

        let names: Vec<_> = list.names().collect();
        assert_eq!(names, vec!["B2", "C", "D"]);
        assert_eq!(list.active().name(), "B2");
    }
}
