// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The closure of every serializable type reachable from the declared
//! roots, with composition edges (member -> type) and inheritance edges
//! (derived -> base, derived -> interface).
//!
//! All structural validation happens in [`TypeGraphBuilder::build`]. The
//! resulting [`TypeGraph`] is immutable and the codecs trust it blindly.
//!
//! Member order inside one declaring type: members with an explicit index
//! come first, sorted by index; members without one follow in declaration
//! order. Inherited members precede the members of the derived type.

use crate::bail;
use crate::error::Error;
use crate::meta::type_def::{MemberDef, TypeDef};
use crate::meta::type_name::{Builtin, TypeExpr};
use crate::types::{type_id_of, TypeKind, Visibility, FIRST_TYPE_ID};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
pub struct MemberNode {
    pub name: String,
    pub type_name: String,
    pub index: Option<u16>,
    pub order: usize,
    pub formatter: Option<String>,
    pub utf8: bool,
    /// Node of the member's declared type. `None` when a formatter owns it.
    pub type_ref: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct TypeNode {
    pub name: String,
    pub id: u16,
    pub kind: TypeKind,
    /// Own members in wire order; see [`TypeGraph::members_of`] for the inherited chain.
    pub members: Vec<MemberNode>,
    pub base: Option<usize>,
    pub interfaces: Vec<usize>,
    /// Type arguments, element types and tuple fields of builtin composites.
    pub composed_of: Vec<usize>,
    /// Concrete descendants, deepest first. Empty unless inheritance is allowed.
    pub subtypes: Vec<usize>,
    pub depth: usize,
    pub allow_inheritance: bool,
    pub is_abstract: bool,
    pub contains_non_public_members: bool,
    pub has_construction_hook: bool,
    pub former_ids: Vec<u16>,
    /// Whether the node came from a [`TypeDef`] rather than from a member type.
    pub declared: bool,
    ancestors: HashSet<usize>,
}

impl TypeNode {
    fn discovered(name: String, kind: TypeKind) -> TypeNode {
        TypeNode {
            id: type_id_of(&name),
            name,
            kind,
            members: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            composed_of: Vec::new(),
            subtypes: Vec::new(),
            depth: 0,
            allow_inheritance: false,
            is_abstract: false,
            contains_non_public_members: false,
            has_construction_hook: false,
            former_ids: Vec::new(),
            declared: false,
            ancestors: HashSet::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TypeGraph {
    nodes: Vec<TypeNode>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<u16, usize>,
}

impl TypeGraph {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[TypeNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> &TypeNode {
        &self.nodes[index]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Option<&TypeNode> {
        self.index_of(name).map(|i| &self.nodes[i])
    }

    /// Declared type answering to `id`, former names included.
    pub fn node_by_id(&self, id: u16) -> Option<&TypeNode> {
        self.by_id.get(&id).map(|i| &self.nodes[*i])
    }

    /// Serialized members of `name`, base-first along the inheritance chain.
    pub fn members_of(&self, name: &str) -> Vec<&MemberNode> {
        let mut chain = Vec::new();
        let mut cursor = self.index_of(name);
        while let Some(i) = cursor {
            chain.push(i);
            cursor = self.nodes[i].base;
        }
        chain
            .iter()
            .rev()
            .flat_map(|i| self.nodes[*i].members.iter())
            .collect()
    }

    /// Whether a value of type `from` may be handed out where `to` is expected.
    pub fn is_assignable(&self, from: &str, to: &str) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(f), Some(t)) => f == t || self.nodes[f].ancestors.contains(&t),
            _ => false,
        }
    }

    pub fn subtypes_of(&self, name: &str) -> impl Iterator<Item = &TypeNode> {
        self.node(name)
            .map(|n| n.subtypes.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|i| &self.nodes[*i])
    }
}

/// Collects [`TypeDef`]s and turns them into a validated [`TypeGraph`].
#[derive(Debug, Default)]
pub struct TypeGraphBuilder {
    defs: Vec<TypeDef>,
    by_name: HashMap<String, usize>,
}

impl TypeGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root declaration. Adding an identical declaration twice is a no-op.
    pub fn add(&mut self, def: TypeDef) -> Result<&mut Self, Error> {
        match self.by_name.get(&def.name) {
            Some(&i) if self.defs[i] == def => {}
            Some(_) => bail!("type `{}` is declared twice with different shapes", def.name),
            None => {
                self.by_name.insert(def.name.clone(), self.defs.len());
                self.defs.push(def);
            }
        }
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn build(self) -> Result<TypeGraph, Error> {
        let mut graph = TypeGraph::default();
        for def in &self.defs {
            if def.visibility != Visibility::Public {
                bail!("serializable type `{}` must be public", def.name);
            }
            let id = match def.explicit_id {
                Some(id) if id < FIRST_TYPE_ID => {
                    bail!("type `{}` asks for reserved id {}", def.name, id)
                }
                Some(id) => id,
                None => type_id_of(&def.name),
            };
            let mut node = TypeNode::discovered(def.name.clone(), def.kind);
            node.id = id;
            node.declared = true;
            node.allow_inheritance = def.allow_inheritance;
            node.is_abstract = !def.is_concrete();
            node.contains_non_public_members = def.contains_non_public_members;
            node.has_construction_hook = def.has_construction_hook;
            node.former_ids = def.former_names.iter().map(|n| type_id_of(n)).collect();
            graph.by_name.insert(def.name.clone(), graph.nodes.len());
            graph.nodes.push(node);
        }

        self.link_inheritance(&mut graph)?;
        self.compute_ancestry(&mut graph)?;
        for (i, def) in self.defs.iter().enumerate() {
            let members = collect_members(def)?;
            graph.nodes[i].members = members;
        }
        check_chain_indices(&graph)?;
        for i in 0..self.defs.len() {
            for m in 0..graph.nodes[i].members.len() {
                if graph.nodes[i].members[m].formatter.is_some() {
                    continue;
                }
                let expr = TypeExpr::parse(&graph.nodes[i].members[m].type_name)?;
                let owner = graph.nodes[i].name.clone();
                let type_ref = discover(&mut graph, &expr, &owner)?;
                graph.nodes[i].members[m].type_ref = Some(type_ref);
            }
        }
        assign_ids(&mut graph)?;
        collect_subtypes(&mut graph);

        log::debug!(
            "type graph built: {} nodes, {} declared, {} polymorphic bases",
            graph.nodes.len(),
            self.defs.len(),
            graph.nodes.iter().filter(|n| !n.subtypes.is_empty()).count()
        );
        Ok(graph)
    }

    fn link_inheritance(&self, graph: &mut TypeGraph) -> Result<(), Error> {
        for (i, def) in self.defs.iter().enumerate() {
            if let Some(base_name) = &def.base {
                let Some(&b) = self.by_name.get(base_name) else {
                    bail!("base type `{}` of `{}` is not registered", base_name, def.name);
                };
                let base = &self.defs[b];
                if !base.allow_inheritance {
                    bail!("`{}` derives from `{}` which does not allow inheritance", def.name, base.name);
                }
                if base.marked && !def.marked {
                    bail!("subtype `{}` of `{}` is missing the serializable marker", def.name, base.name);
                }
                graph.nodes[i].base = Some(b);
            }
            for interface in &def.interfaces {
                // interfaces that were never declared are not serializable and carry no edge
                let Some(&t) = self.by_name.get(interface) else {
                    continue;
                };
                if self.defs[t].marked && !def.marked {
                    bail!("implementor `{}` of `{}` is missing the serializable marker", def.name, interface);
                }
                graph.nodes[i].interfaces.push(t);
            }
        }
        Ok(())
    }

    fn compute_ancestry(&self, graph: &mut TypeGraph) -> Result<(), Error> {
        fn visit(
            graph: &mut TypeGraph,
            i: usize,
            done: &mut [bool],
            active: &mut [bool],
        ) -> Result<(), Error> {
            if done[i] {
                return Ok(());
            }
            if active[i] {
                bail!("inheritance cycle through `{}`", graph.nodes[i].name);
            }
            active[i] = true;
            let parents: Vec<usize> = graph.nodes[i]
                .base
                .iter()
                .chain(graph.nodes[i].interfaces.iter())
                .copied()
                .collect();
            let mut ancestors = HashSet::new();
            let mut depth = 0;
            for p in parents {
                visit(graph, p, done, active)?;
                ancestors.insert(p);
                ancestors.extend(graph.nodes[p].ancestors.iter().copied());
                depth = depth.max(graph.nodes[p].depth + 1);
            }
            graph.nodes[i].ancestors = ancestors;
            graph.nodes[i].depth = depth;
            active[i] = false;
            done[i] = true;
            Ok(())
        }

        let mut done = vec![false; self.defs.len()];
        let mut active = vec![false; self.defs.len()];
        for i in 0..self.defs.len() {
            visit(graph, i, &mut done, &mut active)?;
        }
        Ok(())
    }
}

fn collect_members(def: &TypeDef) -> Result<Vec<MemberNode>, Error> {
    let mut picked: Vec<&MemberDef> = Vec::new();
    for m in &def.members {
        if m.ignore && m.include {
            bail!("member `{}.{}` is both ignored and included", def.name, m.name);
        }
        if m.ignore {
            continue;
        }
        if !def.auto_collect && m.index.is_none() && !m.include {
            continue;
        }
        if m.visibility != Visibility::Public && !def.contains_non_public_members {
            log::warn!(
                "skipping non-public member `{}.{}`: the type does not opt into non-public members",
                def.name,
                m.name
            );
            continue;
        }
        if m.formatter.is_none() {
            let reason = if m.unsupported {
                Some(format!("`{}`", m.type_name))
            } else {
                TypeExpr::parse(&m.type_name)?.unsupported_reason()
            };
            if let Some(reason) = reason {
                bail!("member `{}.{}` has unsupported type {}", def.name, m.name, reason);
            }
        }
        picked.push(m);
    }
    picked.sort_by_key(|m| (m.index.is_none(), m.index, m.order));

    let mut seen = HashSet::new();
    for m in &picked {
        if let Some(index) = m.index {
            if !seen.insert(index) {
                bail!("duplicate member index {} in `{}`", index, def.name);
            }
        }
    }
    Ok(picked
        .into_iter()
        .map(|m| MemberNode {
            name: m.name.clone(),
            type_name: m.type_name.clone(),
            index: m.index,
            order: m.order,
            formatter: m.formatter.clone(),
            utf8: m.utf8,
            type_ref: None,
        })
        .collect())
}

fn check_chain_indices(graph: &TypeGraph) -> Result<(), Error> {
    for node in graph.nodes.iter().filter(|n| n.base.is_some()) {
        let mut owners: HashMap<u16, &str> = HashMap::new();
        let mut cursor = Some(node);
        while let Some(n) = cursor {
            for index in n.members.iter().filter_map(|m| m.index) {
                if let Some(other) = owners.insert(index, n.name.as_str()) {
                    bail!(
                        "member index {} of `{}` collides with `{}` in the inheritance chain of `{}`",
                        index,
                        n.name,
                        other,
                        node.name
                    );
                }
            }
            cursor = n.base.map(|b| &graph.nodes[b]);
        }
    }
    Ok(())
}

/// Ensures a node exists for `expr` and everything it is built from.
fn discover(graph: &mut TypeGraph, expr: &TypeExpr, owner: &str) -> Result<usize, Error> {
    let name = expr.to_string();
    if let Some(&i) = graph.by_name.get(&name) {
        return Ok(i);
    }
    let mut composed_of = Vec::with_capacity(expr.children().len());
    for child in expr.children() {
        composed_of.push(discover(graph, child, owner)?);
    }
    let kind = match (expr.kind(), expr.builtin()) {
        (Some(kind), _) => kind,
        // wrappers encode like what they hold
        (None, Some(Builtin::Transparent)) => composed_of
            .first()
            .map(|c| graph.nodes[*c].kind)
            .unwrap_or(TypeKind::Struct),
        // formatted types land here; an unregistered object fails at encode
        _ => {
            log::debug!(
                "type `{name}` reached from `{owner}` is not declared; treating it as opaque"
            );
            TypeKind::Struct
        }
    };
    let mut node = TypeNode::discovered(name.clone(), kind);
    node.composed_of = composed_of;
    graph.by_name.insert(name, graph.nodes.len());
    graph.nodes.push(node);
    Ok(graph.nodes.len() - 1)
}

fn assign_ids(graph: &mut TypeGraph) -> Result<(), Error> {
    for (i, node) in graph.nodes.iter().enumerate().filter(|(_, n)| n.declared) {
        for id in std::iter::once(node.id).chain(node.former_ids.iter().copied()) {
            if let Some(&other) = graph.by_id.get(&id) {
                if other != i {
                    return Err(Error::id_collision(
                        id,
                        graph.nodes[other].name.clone(),
                        node.name.clone(),
                    ));
                }
            }
            graph.by_id.insert(id, i);
        }
    }
    Ok(())
}

fn collect_subtypes(graph: &mut TypeGraph) {
    for i in 0..graph.nodes.len() {
        if !graph.nodes[i].allow_inheritance {
            continue;
        }
        let mut subtypes: Vec<usize> = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(j, n)| {
                n.declared && !n.is_abstract && (*j == i || n.ancestors.contains(&i))
            })
            .map(|(j, _)| j)
            .collect();
        subtypes.sort_by_key(|j| (Reverse(graph.nodes[*j].depth), graph.nodes[*j].name.clone()));
        log::debug!(
            "`{}` dispatches to {} concrete subtypes",
            graph.nodes[i].name,
            subtypes.len()
        );
        graph.nodes[i].subtypes = subtypes;
    }
}
