//! Per-workspace rings of clients.
//!
//! Every workspace holds its clients in a circular doubly linked ring. Nodes for all rings live
//! in a single arena and are linked by index, with freed slots recycled through a free list.
//! Callers refer to clients through a [ClientKey]: a slot index paired with the generation of
//! that slot, so that a key for a removed client never resolves to whatever reuses its slot.
//!
//! The head of each ring is the focused client of that workspace. A workspace stores its head
//! directly and the registry keeps it pointing at a member of the same ring.
use crate::{pure::Client, Error, Result, Xid};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A stable reference to a client held in a [Registry].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientKey {
    index: usize,
    generation: u64,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
struct Node {
    client: Client,
    wix: usize,
    prev: usize,
    next: usize,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u64,
    node: Option<Node>,
}

/// The ring bookkeeping for a single workspace
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Workspace {
    focused: Option<ClientKey>,
    len: usize,
}

impl Workspace {
    /// The head of this workspace's ring, which is its focused client.
    pub fn focused(&self) -> Option<ClientKey> {
        self.focused
    }

    /// The number of clients on this workspace
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether or not this workspace has any clients
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A client that has been unlinked from its ring by [Registry::remove_by_id].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    /// The client that was removed
    pub client: Client,
    /// The workspace the client was removed from
    pub wix: usize,
    /// Whether the client was the focused client of that workspace
    pub was_focused: bool,
}

/// The set of clients under management, split into one ring per workspace.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Registry {
    slots: Vec<Slot>,
    free: Vec<usize>,
    workspaces: Vec<Workspace>,
}

impl Registry {
    /// Create a new registry with `n` empty workspaces.
    pub fn new(n: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            workspaces: vec![Workspace::default(); n],
        }
    }

    /// The number of workspaces being tracked
    pub fn n_workspaces(&self) -> usize {
        self.workspaces.len()
    }

    /// The ring bookkeeping for workspace `wix` if it exists.
    pub fn workspace(&self, wix: usize) -> Option<&Workspace> {
        self.workspaces.get(wix)
    }

    /// The number of clients on workspace `wix`. Unknown workspaces are empty.
    pub fn len(&self, wix: usize) -> usize {
        self.workspace(wix).map(|w| w.len).unwrap_or(0)
    }

    /// Whether workspace `wix` has no clients. Unknown workspaces are empty.
    pub fn is_empty(&self, wix: usize) -> bool {
        self.len(wix) == 0
    }

    /// The key of the focused client on workspace `wix`
    pub fn focused_key(&self, wix: usize) -> Option<ClientKey> {
        self.workspace(wix).and_then(|w| w.focused)
    }

    /// The focused client on workspace `wix`
    pub fn focused(&self, wix: usize) -> Option<&Client> {
        self.focused_key(wix).and_then(|k| self.get(k))
    }

    /// Look up a client by key. Keys for clients that have since been removed resolve to `None`.
    pub fn get(&self, key: ClientKey) -> Option<&Client> {
        self.node(key).map(|n| &n.client)
    }

    /// Mutable access to a client by key.
    pub fn get_mut(&mut self, key: ClientKey) -> Option<&mut Client> {
        self.node_mut(key).map(|n| &mut n.client)
    }

    /// The workspace holding the client for `key`
    pub fn workspace_of(&self, key: ClientKey) -> Option<usize> {
        self.node(key).map(|n| n.wix)
    }

    /// The key of the client following `key` in its ring.
    pub fn next_key(&self, key: ClientKey) -> Option<ClientKey> {
        self.node(key).and_then(|n| self.key_for(n.next))
    }

    /// The key of the client preceding `key` in its ring.
    pub fn prev_key(&self, key: ClientKey) -> Option<ClientKey> {
        self.node(key).and_then(|n| self.key_for(n.prev))
    }

    /// Iterate over the clients of workspace `wix`, starting from the focused client and
    /// following `next` links around the ring.
    pub fn iter(&self, wix: usize) -> Iter<'_> {
        Iter {
            registry: self,
            next: self.focused_key(wix).map(|k| k.index),
            remaining: self.len(wix),
        }
    }

    /// The ids of all clients on workspace `wix` in ring order from the focused client.
    pub fn ids(&self, wix: usize) -> Vec<Xid> {
        self.iter(wix).map(|c| c.id).collect()
    }

    /// Splice `client` into the ring for workspace `wix` directly before the current head,
    /// making it the new head (and so the focused client) of that workspace.
    pub fn insert(&mut self, client: Client, wix: usize) -> Result<ClientKey> {
        let n = self.n_workspaces();
        let head = match self.workspaces.get(wix) {
            Some(w) => w.focused,
            None => return Err(Error::UnknownWorkspace { wix, n }),
        };

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };

        let (prev, next) = match head.and_then(|h| self.node(h).map(|n| (n.prev, h.index))) {
            Some((tail, head)) => (tail, head),
            None => (index, index),
        };

        let slot = &mut self.slots[index];
        slot.node = Some(Node {
            client,
            wix,
            prev,
            next,
        });
        let key = ClientKey {
            index,
            generation: slot.generation,
        };

        if next != index {
            self.link_next(prev, index);
            self.link_prev(next, index);
        }

        let w = &mut self.workspaces[wix];
        w.focused = Some(key);
        w.len += 1;

        trace!(id = %client.id, wix, len = w.len, "inserted client");

        Ok(key)
    }

    /// Unlink the focused client of workspace `wix` and return it. The following client in the
    /// ring becomes the new head.
    pub fn remove_focused(&mut self, wix: usize) -> Result<Client> {
        let n = self.n_workspaces();
        let key = match self.workspaces.get(wix) {
            Some(w) => w.focused.ok_or(Error::EmptyWorkspace { wix })?,
            None => return Err(Error::UnknownWorkspace { wix, n }),
        };

        self.unlink(key)
            .map(|(client, _)| client)
            .ok_or(Error::EmptyWorkspace { wix })
    }

    /// Find the client with the given id on workspace `wix`.
    pub fn find(&self, id: Xid, wix: usize) -> Option<ClientKey> {
        let mut next = self.focused_key(wix).map(|k| k.index);

        for _ in 0..self.len(wix) {
            let index = next?;
            let node = self.slots.get(index)?.node.as_ref()?;
            if node.client.id == id {
                return self.key_for(index);
            }
            next = Some(node.next);
        }

        None
    }

    /// Find the client with the given id on any workspace, returning the workspace it is on
    /// along with its key.
    pub fn find_any(&self, id: Xid) -> Option<(usize, ClientKey)> {
        (0..self.n_workspaces()).find_map(|wix| self.find(id, wix).map(|k| (wix, k)))
    }

    /// Whether a client with the given id is on any workspace
    pub fn contains(&self, id: Xid) -> bool {
        self.find_any(id).is_some()
    }

    /// Unlink the client with the given id from whichever ring currently holds it.
    pub fn remove_by_id(&mut self, id: Xid) -> Option<Removed> {
        let (wix, key) = self.find_any(id)?;
        let was_focused = self.focused_key(wix) == Some(key);
        let (client, wix) = self.unlink(key)?;

        Some(Removed {
            client,
            wix,
            was_focused,
        })
    }

    /// Make `key` the head of its ring, and so the focused client of its workspace.
    pub fn set_focused(&mut self, key: ClientKey) -> Result<()> {
        let wix = self
            .workspace_of(key)
            .ok_or_else(|| crate::custom_error!("stale client key: {:?}", key))?;
        self.workspaces[wix].focused = Some(key);

        Ok(())
    }

    fn key_for(&self, index: usize) -> Option<ClientKey> {
        let slot = self.slots.get(index)?;
        slot.node.as_ref()?;

        Some(ClientKey {
            index,
            generation: slot.generation,
        })
    }

    fn node(&self, key: ClientKey) -> Option<&Node> {
        let slot = self.slots.get(key.index)?;
        if slot.generation != key.generation {
            return None;
        }

        slot.node.as_ref()
    }

    fn node_mut(&mut self, key: ClientKey) -> Option<&mut Node> {
        let slot = self.slots.get_mut(key.index)?;
        if slot.generation != key.generation {
            return None;
        }

        slot.node.as_mut()
    }

    fn link_next(&mut self, index: usize, next: usize) {
        if let Some(n) = self.slots.get_mut(index).and_then(|s| s.node.as_mut()) {
            n.next = next;
        }
    }

    fn link_prev(&mut self, index: usize, prev: usize) {
        if let Some(n) = self.slots.get_mut(index).and_then(|s| s.node.as_mut()) {
            n.prev = prev;
        }
    }

    fn unlink(&mut self, key: ClientKey) -> Option<(Client, usize)> {
        let Node {
            client,
            wix,
            prev,
            next,
        } = self.node(key)?.clone();

        let new_head = self.key_for(next);
        let w = self.workspaces.get_mut(wix)?;
        w.len -= 1;

        if w.len == 0 {
            w.focused = None;
        } else {
            if w.focused == Some(key) {
                w.focused = new_head;
            }
            self.link_next(prev, next);
            self.link_prev(next, prev);
        }

        let slot = &mut self.slots[key.index];
        slot.node = None;
        slot.generation += 1;
        self.free.push(key.index);

        trace!(id = %client.id, wix, "removed client");

        Some((client, wix))
    }
}

/// Iterator over the clients of a single workspace in ring order.
#[derive(Debug)]
pub struct Iter<'a> {
    registry: &'a Registry,
    next: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Client;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.registry.slots.get(self.next?)?.node.as_ref()?;
        self.remaining -= 1;
        self.next = Some(node.next);

        Some(&node.client)
    }
}

#[cfg(test)]
impl Registry {
    // Walk every ring in both directions and check that the links, lengths and heads agree.
    pub(crate) fn check_invariants(&self) {
        let mut seen = 0;

        for (wix, w) in self.workspaces.iter().enumerate() {
            let head = match w.focused {
                Some(head) => head,
                None => {
                    assert_eq!(w.len, 0, "workspace {wix} has no head but len {}", w.len);
                    continue;
                }
            };

            assert_eq!(self.workspace_of(head), Some(wix), "head of {wix} is not in its ring");

            let mut forward = vec![head];
            let mut k = head;
            loop {
                k = self.next_key(k).expect("dangling next link");
                if k == head {
                    break;
                }
                assert!(forward.len() < w.len, "ring for {wix} is longer than {}", w.len);
                assert_eq!(self.workspace_of(k), Some(wix), "node linked across workspaces");
                forward.push(k);
            }
            assert_eq!(forward.len(), w.len);

            let mut backward = vec![head];
            let mut k = head;
            loop {
                k = self.prev_key(k).expect("dangling prev link");
                if k == head {
                    break;
                }
                backward.push(k);
            }
            backward[1..].reverse();
            assert_eq!(forward, backward, "prev links are not the reverse of next links");

            seen += w.len;
        }

        let live = self.slots.iter().filter(|s| s.node.is_some()).count();
        assert_eq!(seen, live, "nodes exist that are not in any ring");
        assert_eq!(self.free.len(), self.slots.len() - live);
    }
}
